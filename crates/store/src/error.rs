/// Errors from book store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A book with this id already exists in the store.
    #[error("duplicate book id: {0}")]
    DuplicateId(String),

    /// I/O error against the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure while persisting the collection.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
