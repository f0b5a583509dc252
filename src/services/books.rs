//! Books service

use crate::{
    error::AppResult,
    models::book::{Book, BookCandidate},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every book, in the order it was added
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let books = self.repository.books.list().await;
        tracing::debug!(count = books.len(), "Listing books");
        Ok(books)
    }

    /// The book with the given id, or `None` when nothing matches
    pub async fn get_book(&self, id: i64) -> AppResult<Option<Book>> {
        let book = self.repository.books.find_by_id(id).await;
        tracing::debug!(id, found = book.is_some(), "Looked up book");
        Ok(book)
    }

    /// Validate a candidate and append it to the store.
    ///
    /// The store is not touched when required fields are missing; a taken id
    /// yields `AppError::Conflict` and leaves the store as it was.
    pub async fn create_book(&self, candidate: BookCandidate) -> AppResult<Book> {
        let book = candidate.into_book()?;
        let created = self.repository.books.insert(book).await?;
        tracing::info!(id = created.id, title = %created.title, "Book created");
        Ok(created)
    }

    /// Number of books in the store
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }

    /// Insert configured books at startup, in order
    pub async fn seed(&self, books: Vec<Book>) -> AppResult<()> {
        for book in books {
            self.repository.books.insert(book).await?;
        }
        tracing::info!(count = self.count().await, "Book store seeded");
        Ok(())
    }
}
