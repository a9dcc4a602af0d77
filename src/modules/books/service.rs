use std::sync::Arc;

use shelfline_store::{Book, BookPatch, BookStore, ReadingStatus, StoreResult};
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{NewBook, UpdateBook};

/// Filter applied conjunctively by [`ReadingListService::list_books`].
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Exact status match.
    pub status: Option<ReadingStatus>,
    /// Case-insensitive substring match on the author.
    pub author: Option<String>,
    /// Case-insensitive exact match against any tag.
    pub tag: Option<String>,
}

/// Business rules over the book store: id assignment, field normalization,
/// status-transition side effects, filtering, and sorting.
///
/// The service never caches books across calls; every operation works on a
/// fresh snapshot from the store, and store faults propagate unchanged.
pub struct ReadingListService {
    store: Arc<dyn BookStore>,
}

impl ReadingListService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Create a book with a fresh id, trimmed fields, and status `to-read`.
    pub async fn add_book(&self, input: NewBook) -> StoreResult<Book> {
        let book = Book {
            id: Uuid::now_v7().to_string(),
            title: input.title.trim().to_string(),
            author: input.author.trim().to_string(),
            pages: input.pages,
            status: ReadingStatus::ToRead,
            added_at: OffsetDateTime::now_utc(),
            started_at: None,
            completed_at: None,
            notes: input.notes,
            tags: input
                .tags
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        };
        self.store.add(book.clone()).await?;
        Ok(book)
    }

    /// List books matching `filter`, most recently added first.
    ///
    /// The sort is stable, so ties on `added_at` keep the store's snapshot
    /// order.
    pub async fn list_books(&self, filter: ListFilter) -> StoreResult<Vec<Book>> {
        let mut books = self.store.list().await?;

        if let Some(status) = filter.status {
            books.retain(|b| b.status == status);
        }
        if let Some(author) = &filter.author {
            let needle = author.to_lowercase();
            books.retain(|b| b.author.to_lowercase().contains(&needle));
        }
        if let Some(tag) = &filter.tag {
            let needle = tag.to_lowercase();
            books.retain(|b| b.tags.iter().any(|t| t.to_lowercase() == needle));
        }

        books.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(books)
    }

    pub async fn get_book(&self, id: &str) -> StoreResult<Option<Book>> {
        self.store.get_by_id(id).await
    }

    /// Merge caller-supplied fields onto the stored book.
    ///
    /// When the update carries a status, the transition rules decide
    /// `started_at` and `completed_at`: `to-read` clears both, `reading`
    /// starts now (unless supplied) and clears completion, `completed` stamps
    /// both (unless supplied). Moving back to `to-read` discards the old
    /// timestamps for good.
    pub async fn update_book(&self, id: &str, input: UpdateBook) -> StoreResult<Option<Book>> {
        let mut patch = BookPatch {
            title: input.title,
            author: input.author,
            pages: input.pages.map(Some),
            notes: input.notes.map(Some),
            tags: input.tags,
            status: input.status,
            started_at: input.started_at.map(Some),
            completed_at: input.completed_at.map(Some),
        };

        if let Some(status) = input.status {
            let now = OffsetDateTime::now_utc();
            match status {
                ReadingStatus::ToRead => {
                    patch.started_at = Some(None);
                    patch.completed_at = Some(None);
                }
                ReadingStatus::Reading => {
                    patch.started_at = Some(Some(input.started_at.unwrap_or(now)));
                    patch.completed_at = Some(None);
                }
                ReadingStatus::Completed => {
                    patch.started_at = Some(Some(input.started_at.unwrap_or(now)));
                    patch.completed_at = Some(Some(input.completed_at.unwrap_or(now)));
                }
            }
        }

        self.store.update(id, patch).await
    }

    pub async fn remove_book(&self, id: &str) -> StoreResult<bool> {
        self.store.remove(id).await
    }

    /// Convenience wrapper for status-only updates.
    pub async fn set_status(&self, id: &str, status: ReadingStatus) -> StoreResult<Option<Book>> {
        self.update_book(
            id,
            UpdateBook {
                status: Some(status),
                ..UpdateBook::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfline_store::JsonStore;
    use time::macros::datetime;

    fn service() -> ReadingListService {
        ReadingListService::new(Arc::new(JsonStore::in_memory()))
    }

    fn new_book(title: &str, author: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            pages: None,
            notes: None,
            tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn add_book_starts_as_to_read_with_fresh_id() {
        let service = service();

        let first = service
            .add_book(new_book("  The Hobbit  ", " J.R.R. Tolkien "))
            .await
            .unwrap();
        let second = service
            .add_book(new_book("The Hobbit", "J.R.R. Tolkien"))
            .await
            .unwrap();

        assert_eq!(first.status, ReadingStatus::ToRead);
        assert_eq!(first.started_at, None);
        assert_eq!(first.completed_at, None);
        assert_eq!(first.title, "The Hobbit");
        assert_eq!(first.author, "J.R.R. Tolkien");
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn add_book_drops_empty_tags() {
        let service = service();

        let book = service
            .add_book(NewBook {
                tags: vec![" fantasy ".to_string(), "   ".to_string(), "".to_string()],
                ..new_book("Elantris", "Brandon Sanderson")
            })
            .await
            .unwrap();

        assert_eq!(book.tags, vec!["fantasy".to_string()]);
    }

    #[tokio::test]
    async fn get_book_is_idempotent_without_mutation() {
        let service = service();
        let added = service.add_book(new_book("Piranesi", "Clarke")).await.unwrap();

        let first = service.get_book(&added.id).await.unwrap();
        let second = service.get_book(&added.id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Some(added));
    }

    #[tokio::test]
    async fn status_transitions_keep_timestamp_invariants() {
        let service = service();
        let added = service.add_book(new_book("Dune", "Herbert")).await.unwrap();

        let reading = service
            .set_status(&added.id, ReadingStatus::Reading)
            .await
            .unwrap()
            .unwrap();
        assert!(reading.started_at.is_some());
        assert_eq!(reading.completed_at, None);

        let completed = service
            .set_status(&added.id, ReadingStatus::Completed)
            .await
            .unwrap()
            .unwrap();
        assert!(completed.started_at.is_some());
        assert!(completed.completed_at.is_some());

        let back = service
            .set_status(&added.id, ReadingStatus::ToRead)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(back.started_at, None);
        assert_eq!(back.completed_at, None);
    }

    #[tokio::test]
    async fn status_update_prefers_caller_supplied_timestamps() {
        let service = service();
        let added = service.add_book(new_book("Dune", "Herbert")).await.unwrap();

        let started = datetime!(2024-05-01 09:00:00 UTC);
        let updated = service
            .update_book(
                &added.id,
                UpdateBook {
                    status: Some(ReadingStatus::Reading),
                    started_at: Some(started),
                    ..UpdateBook::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.started_at, Some(started));
        assert_eq!(updated.completed_at, None);
    }

    #[tokio::test]
    async fn update_preserves_id_and_added_at() {
        let service = service();
        let added = service.add_book(new_book("Dune", "Herbert")).await.unwrap();

        let updated = service
            .update_book(
                &added.id,
                UpdateBook {
                    title: Some("Dune Messiah".to_string()),
                    pages: Some(331),
                    ..UpdateBook::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, added.id);
        assert_eq!(updated.added_at, added.added_at);
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.pages, Some(331));

        let missing = service
            .update_book("unknown", UpdateBook::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn list_filters_are_conjunctive_and_case_insensitive() {
        let service = service();
        let first = service
            .add_book(NewBook {
                tags: vec!["Sci-Fi".to_string()],
                ..new_book("Dune", "Frank Herbert")
            })
            .await
            .unwrap();
        service
            .add_book(new_book("The Hobbit", "J.R.R. Tolkien"))
            .await
            .unwrap();
        service
            .set_status(&first.id, ReadingStatus::Reading)
            .await
            .unwrap();

        let by_status = service
            .list_books(ListFilter {
                status: Some(ReadingStatus::Reading),
                ..ListFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert!(by_status.iter().all(|b| b.status == ReadingStatus::Reading));

        let by_author = service
            .list_books(ListFilter {
                author: Some("herb".to_string()),
                ..ListFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_author.len(), 1);
        assert_eq!(by_author[0].title, "Dune");

        let by_tag = service
            .list_books(ListFilter {
                tag: Some("sci-fi".to_string()),
                ..ListFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(by_tag.len(), 1);

        let conjunctive = service
            .list_books(ListFilter {
                status: Some(ReadingStatus::Reading),
                author: Some("tolkien".to_string()),
                tag: None,
            })
            .await
            .unwrap();
        assert!(conjunctive.is_empty());
    }

    #[tokio::test]
    async fn list_sorts_by_added_at_descending() {
        let store = Arc::new(JsonStore::in_memory());
        let service = ReadingListService::new(store.clone());

        let older = Book {
            id: "a".to_string(),
            title: "A".to_string(),
            author: "X".to_string(),
            pages: None,
            status: ReadingStatus::ToRead,
            added_at: datetime!(2024-01-01 10:00:00 UTC),
            started_at: None,
            completed_at: None,
            notes: None,
            tags: Vec::new(),
        };
        let newer = Book {
            id: "b".to_string(),
            added_at: datetime!(2024-01-02 10:00:00 UTC),
            title: "B".to_string(),
            ..older.clone()
        };
        store.add(older.clone()).await.unwrap();
        store.add(newer.clone()).await.unwrap();

        let listed = service.list_books(ListFilter::default()).await.unwrap();
        assert_eq!(listed, vec![newer, older]);
    }

    #[tokio::test]
    async fn remove_book_reports_whether_anything_was_removed() {
        let service = service();
        let added = service.add_book(new_book("Dune", "Herbert")).await.unwrap();

        assert!(service.remove_book(&added.id).await.unwrap());
        assert!(!service.remove_book(&added.id).await.unwrap());
        assert_eq!(service.get_book(&added.id).await.unwrap(), None);
    }
}
