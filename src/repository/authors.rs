//! Authors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorQuery, AuthorStats, CreateAuthor, UpdateAuthor},
        book::Book,
    },
};

/// Map a client-supplied ordering value to an ORDER BY clause.
/// Unknown values fall back to the default (name ascending).
pub(crate) fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("-name") => "name DESC",
        _ => "name ASC",
    }
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors with optional free-text search over name and bio,
    /// returning the page of rows and the total match count.
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        let order = order_clause(query.ordering.as_deref());

        let (authors, total) = if let Some(ref search) = query.search {
            let pattern = format!("%{}%", search);
            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM authors WHERE name ILIKE $1 OR bio ILIKE $1",
            )
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

            let rows = sqlx::query_as::<_, Author>(&format!(
                "SELECT id, name, bio, website FROM authors \
                 WHERE name ILIKE $1 OR bio ILIKE $1 \
                 ORDER BY {} LIMIT $2 OFFSET $3",
                order
            ))
            .bind(&pattern)
            .bind(query.per_page())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;
            (rows, total)
        } else {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
                .fetch_one(&self.pool)
                .await?;

            let rows = sqlx::query_as::<_, Author>(&format!(
                "SELECT id, name, bio, website FROM authors ORDER BY {} LIMIT $1 OFFSET $2",
                order
            ))
            .bind(query.per_page())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;
            (rows, total)
        };

        Ok((authors, total))
    }

    /// All authors ordered by name, for the server-rendered pages
    pub async fn list_all(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, name, bio, website FROM authors ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT id, name, bio, website FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Create a new author
    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, bio, website) VALUES ($1, $2, $3) \
             RETURNING id, name, bio, website",
        )
        .bind(&data.name)
        .bind(&data.bio)
        .bind(&data.website)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    /// Update an author; absent fields keep their stored value
    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET \
                name = COALESCE($1, name), \
                bio = COALESCE($2, bio), \
                website = COALESCE($3, website) \
             WHERE id = $4 \
             RETURNING id, name, bio, website",
        )
        .bind(&data.name)
        .bind(&data.bio)
        .bind(&data.website)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Delete an author. Books cascade at the database level.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }

    /// All books belonging to an author, most recent first
    pub async fn books(&self, author_id: i32) -> AppResult<Vec<Book>> {
        // 404 on unknown author rather than an empty list
        self.get_by_id(author_id).await?;

        let books = sqlx::query_as::<_, Book>(
            "SELECT b.id, b.title, b.author_id AS author, a.name AS author_name, \
                    b.published_date, b.is_available \
             FROM books b JOIN authors a ON a.id = b.author_id \
             WHERE b.author_id = $1 \
             ORDER BY b.published_date DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Total and available book counts for every author, one grouped
    /// aggregation pass, ordered by author name.
    pub async fn stats(&self) -> AppResult<Vec<AuthorStats>> {
        let stats = sqlx::query_as::<_, AuthorStats>(
            "SELECT a.name, \
                    COUNT(b.id) AS total_books, \
                    COUNT(b.id) FILTER (WHERE b.is_available) AS available_books \
             FROM authors a \
             LEFT JOIN books b ON b.author_id = a.id \
             GROUP BY a.id, a.name \
             ORDER BY a.name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_whitelist_falls_back_to_name() {
        assert_eq!(order_clause(Some("name")), "name ASC");
        assert_eq!(order_clause(Some("-name")), "name DESC");
        assert_eq!(order_clause(None), "name ASC");
        // Unknown values never reach the SQL string
        assert_eq!(order_clause(Some("id; DROP TABLE authors")), "name ASC");
    }
}
