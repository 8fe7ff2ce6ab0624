//! Author management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorQuery, AuthorStats, CreateAuthor, UpdateAuthor},
        book::Book,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors with search and pagination
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        self.repository.authors.list(query).await
    }

    /// All authors ordered by name
    pub async fn all(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list_all().await
    }

    /// Get author by ID
    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    /// Create a new author
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        data.validate()?;
        let author = self.repository.authors.create(data).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }

    /// Update an author
    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        data.validate()?;
        self.repository.authors.update(id, data).await
    }

    /// Delete an author and, by cascade, all of their books
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = id, "Author deleted (books cascaded)");
        Ok(())
    }

    /// All books for a given author
    pub async fn books(&self, author_id: i32) -> AppResult<Vec<Book>> {
        self.repository.authors.books(author_id).await
    }

    /// Book counts per author
    pub async fn stats(&self) -> AppResult<Vec<AuthorStats>> {
        self.repository.authors.stats().await
    }
}
