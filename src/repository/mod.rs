//! Repository layer for book storage

pub mod books;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{error::AppResult, models::book::Book};

pub use books::MemoryBookStore;

/// Storage seam for book records.
///
/// Implementations keep insertion order and never hold two books with the same id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books in insertion order
    async fn list(&self) -> Vec<Book>;

    /// The book with the given id, if any
    async fn find_by_id(&self, id: i64) -> Option<Book>;

    /// Append a book; fails with `AppError::Conflict` if the id is taken
    async fn insert(&self, book: Book) -> AppResult<Book>;

    /// Number of stored books
    async fn count(&self) -> usize;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a repository over the given book store
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    /// Create a repository backed by an empty in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBookStore::new()))
    }
}
