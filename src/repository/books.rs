//! In-memory book store

use async_trait::async_trait;
use indexmap::{map::Entry, IndexMap};
use tokio::sync::RwLock;

use super::BookStore;
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, DUPLICATE_ID_MESSAGE},
};

/// Process-local store: an id-keyed map that remembers insertion order
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<IndexMap<i64, Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn list(&self) -> Vec<Book> {
        self.books.read().await.values().cloned().collect()
    }

    async fn find_by_id(&self, id: i64) -> Option<Book> {
        self.books.read().await.get(&id).cloned()
    }

    async fn insert(&self, book: Book) -> AppResult<Book> {
        // Check and append under one guard so concurrent creates cannot both win
        let mut books = self.books.write().await;
        match books.entry(book.id) {
            Entry::Occupied(_) => Err(AppError::Conflict(DUPLICATE_ID_MESSAGE.to_string())),
            Entry::Vacant(slot) => Ok(slot.insert(book).clone()),
        }
    }

    async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}
