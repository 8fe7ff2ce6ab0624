//! Book management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
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

    /// List books with search, filters and pagination
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.list(query).await
    }

    /// Get book by ID
    pub async fn get(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        data.validate()?;
        let book = self.repository.books.create(data).await?;
        tracing::info!(book_id = book.id, "Book created");
        Ok(book)
    }

    /// Update a book
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        data.validate()?;
        self.repository.books.update(id, data).await
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    /// All available books
    pub async fn available(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_available().await
    }

    /// Flip a book's availability flag, returning the new value
    pub async fn toggle_availability(&self, id: i32) -> AppResult<bool> {
        let is_available = self.repository.books.toggle_availability(id).await?;
        tracing::info!(book_id = id, is_available, "Book availability toggled");
        Ok(is_available)
    }

    /// Set availability over a selection of books in one update
    pub async fn set_availability(&self, ids: &[i32], is_available: bool) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let updated = self.repository.books.set_availability(ids, is_available).await?;
        tracing::info!(updated, is_available, "Bulk availability update");
        Ok(updated)
    }
}
