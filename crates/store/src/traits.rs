use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{Book, BookPatch};

/// Durable keyed collection of [`Book`] records.
///
/// All implementations must satisfy these invariants:
/// - `list` returns a snapshot copy, decoupled from later mutations.
/// - Book ids are unique for the lifetime of the store; `add` rejects
///   collisions.
/// - Mutations are durable before the call returns; write faults are
///   propagated, never swallowed.
/// - Same-process mutations are serialized internally. Concurrent writers
///   from other processes are not supported.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Snapshot of the full collection, in insertion order.
    async fn list(&self) -> StoreResult<Vec<Book>>;

    /// Look up a single book. Returns `Ok(None)` if the id is unknown.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Append a book. Fails with [`StoreError::DuplicateId`] if the id is
    /// already present.
    ///
    /// [`StoreError::DuplicateId`]: crate::error::StoreError::DuplicateId
    async fn add(&self, book: Book) -> StoreResult<()>;

    /// Merge `patch` onto the stored record and return the merged book, or
    /// `Ok(None)` if the id is unknown.
    async fn update(&self, id: &str, patch: BookPatch) -> StoreResult<Option<Book>>;

    /// Remove a book. Returns `true` if something was removed.
    async fn remove(&self, id: &str) -> StoreResult<bool>;

    /// Drop every record.
    async fn clear(&self) -> StoreResult<()>;
}
