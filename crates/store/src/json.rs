use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::{StoreError, StoreResult};
use crate::model::{Book, BookPatch};
use crate::traits::BookStore;

/// File-backed book store.
///
/// The collection is held in memory and re-serialized wholesale to the
/// backing file on every mutation. The mutex is held across the whole
/// load-mutate-persist sequence, so same-process mutations cannot interleave
/// and drop writes.
pub struct JsonStore {
    path: Option<PathBuf>,
    books: Mutex<Vec<Book>>,
}

impl JsonStore {
    /// Open a store backed by `path`, loading any previously persisted
    /// collection.
    ///
    /// A missing file is initialized empty (parent directories included). An
    /// unreadable or corrupt file logs a warning and the store starts empty;
    /// the bad contents stay on disk until the next mutation overwrites them.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let books = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<Book>>(&bytes) {
                Ok(books) => books,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse store file, starting empty"
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                // Initialize the backing file so the resource exists from now on.
                tokio::fs::write(&path, b"[]").await?;
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read store file, starting empty"
                );
                Vec::new()
            }
        };

        tracing::debug!(path = %path.display(), books = books.len(), "book store opened");

        Ok(Self {
            path: Some(path),
            books: Mutex::new(books),
        })
    }

    /// Store with no backing file; contents live only in memory.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            books: Mutex::new(Vec::new()),
        }
    }

    /// Rewrite the entire collection over the backing file.
    async fn persist(&self, books: &[Book]) -> StoreResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(books)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for JsonStore {
    async fn list(&self) -> StoreResult<Vec<Book>> {
        let books = self.books.lock().await;
        Ok(books.clone())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let books = self.books.lock().await;
        Ok(books.iter().find(|b| b.id == id).cloned())
    }

    async fn add(&self, book: Book) -> StoreResult<()> {
        let mut books = self.books.lock().await;
        if books.iter().any(|b| b.id == book.id) {
            return Err(StoreError::DuplicateId(book.id));
        }
        books.push(book);
        self.persist(&books).await
    }

    async fn update(&self, id: &str, patch: BookPatch) -> StoreResult<Option<Book>> {
        let mut books = self.books.lock().await;
        let Some(index) = books.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        let merged = books[index].merged(&patch);
        books[index] = merged.clone();
        self.persist(&books).await?;
        Ok(Some(merged))
    }

    async fn remove(&self, id: &str) -> StoreResult<bool> {
        let mut books = self.books.lock().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        let changed = books.len() != before;
        if changed {
            self.persist(&books).await?;
        }
        Ok(changed)
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut books = self.books.lock().await;
        books.clear();
        self.persist(&books).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReadingStatus;
    use time::macros::datetime;
    use time::OffsetDateTime;

    fn book(id: &str, title: &str, added_at: OffsetDateTime) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: "Ursula K. Le Guin".to_string(),
            pages: Some(200),
            status: ReadingStatus::ToRead,
            added_at,
            started_at: None,
            completed_at: None,
            notes: None,
            tags: vec!["fiction".to_string()],
        }
    }

    #[tokio::test]
    async fn open_initializes_missing_file_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("books.json");

        let store = JsonStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents, "[]");
    }

    #[tokio::test]
    async fn open_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = JsonStore::open(&path).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persisted_collection_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let store = JsonStore::open(&path).await.unwrap();
        let first = book("b-1", "The Dispossessed", datetime!(2024-01-01 10:00:00 UTC));
        let second = book("b-2", "The Lathe of Heaven", datetime!(2024-01-02 10:00:00 UTC));
        store.add(first.clone()).await.unwrap();
        store.add(second.clone()).await.unwrap();
        drop(store);

        let reopened = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn add_rejects_duplicate_id() {
        let store = JsonStore::in_memory();
        let added = book("b-1", "Kindred", datetime!(2024-01-01 10:00:00 UTC));
        store.add(added.clone()).await.unwrap();

        let result = store.add(added).await;
        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == "b-1"));
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let store = JsonStore::in_memory();
        let added = book("b-1", "Parable", datetime!(2024-01-01 10:00:00 UTC));
        store.add(added.clone()).await.unwrap();

        let patch = BookPatch {
            title: Some("Parable of the Sower".to_string()),
            ..BookPatch::default()
        };
        let updated = store.update("b-1", patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "Parable of the Sower");
        assert_eq!(updated.author, added.author);
        assert_eq!(updated.added_at, added.added_at);

        assert_eq!(store.get_by_id("b-1").await.unwrap(), Some(updated));
        let missing = store.update("nope", BookPatch::default()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn remove_of_unknown_id_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let store = JsonStore::open(&path).await.unwrap();
        store
            .add(book("b-1", "Binti", datetime!(2024-01-01 10:00:00 UTC)))
            .await
            .unwrap();
        let before = tokio::fs::read_to_string(&path).await.unwrap();

        assert!(!store.remove("missing").await.unwrap());
        let after = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(before, after);

        assert!(store.remove("b-1").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_rewrites_file_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("books.json");

        let store = JsonStore::open(&path).await.unwrap();
        store
            .add(book("b-1", "Lagoon", datetime!(2024-01-01 10:00:00 UTC)))
            .await
            .unwrap();
        store.clear().await.unwrap();

        let reopened = JsonStore::open(&path).await.unwrap();
        assert!(reopened.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_returns_snapshot_copy() {
        let store = JsonStore::in_memory();
        store
            .add(book("b-1", "Dawn", datetime!(2024-01-01 10:00:00 UTC)))
            .await
            .unwrap();

        let snapshot = store.list().await.unwrap();
        store
            .add(book("b-2", "Imago", datetime!(2024-01-02 10:00:00 UTC)))
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
