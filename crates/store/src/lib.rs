//! Book data model and persistence for shelfline.
//!
//! The store owns the authoritative book collection. Callers go through the
//! [`BookStore`] trait; [`JsonStore`] is the file-backed implementation that
//! rewrites the whole collection to disk on every mutation. There is exactly
//! one writer per file: same-process mutations are serialized internally,
//! cross-process access is not supported.

pub mod error;
pub mod json;
pub mod model;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use json::JsonStore;
pub use model::{Book, BookPatch, InvalidStatus, ReadingStatus};
pub use traits::BookStore;
