//! Books repository
//!
//! Every read joins the author row so the API representation carries the
//! author name without a second query.

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

const BOOK_COLUMNS: &str = "b.id, b.title, b.author_id AS author, a.name AS author_name, \
                            b.published_date, b.is_available";

/// Map a client-supplied ordering value to an ORDER BY clause.
/// Unknown values fall back to the default (published date descending).
pub(crate) fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("title") => "b.title ASC",
        Some("-title") => "b.title DESC",
        Some("published_date") => "b.published_date ASC",
        _ => "b.published_date DESC",
    }
}

/// Append the WHERE conditions for a book query, binding all values.
fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a BookQuery) {
    builder.push(" WHERE 1=1");

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (b.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(author) = query.author {
        builder.push(" AND b.author_id = ").push_bind(author);
    }

    if let Some(is_available) = query.is_available {
        builder.push(" AND b.is_available = ").push_bind(is_available);
    }
}

fn map_author_fk(e: sqlx::Error, author_id: i32) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::field("author", format!("Author {} does not exist.", author_id))
        }
        _ => AppError::from(e),
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books with search, filters, ordering and pagination,
    /// returning the page of rows and the total match count.
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let mut count_builder = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM books b JOIN authors a ON a.id = b.author_id",
        );
        push_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id",
            BOOK_COLUMNS
        ));
        push_filters(&mut builder, query);
        builder
            .push(" ORDER BY ")
            .push(order_clause(query.ordering.as_deref()))
            .push(" LIMIT ")
            .push_bind(query.per_page())
            .push(" OFFSET ")
            .push_bind(query.offset());

        let books = builder
            .build_query_as::<Book>()
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id WHERE b.id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a new book. An unknown author id surfaces as a field-level
    /// validation error, not a database failure.
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO books (title, author_id, published_date, is_available) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&data.title)
        .bind(data.author)
        .bind(data.published_date)
        .bind(data.is_available)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_author_fk(e, data.author))?;

        self.get_by_id(id).await
    }

    /// Update a book; absent fields keep their stored value
    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let updated: Option<i32> = sqlx::query_scalar(
            "UPDATE books SET \
                title = COALESCE($1, title), \
                author_id = COALESCE($2, author_id), \
                published_date = COALESCE($3, published_date), \
                is_available = COALESCE($4, is_available) \
             WHERE id = $5 \
             RETURNING id",
        )
        .bind(&data.title)
        .bind(data.author)
        .bind(data.published_date)
        .bind(data.is_available)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_author_fk(e, data.author.unwrap_or_default()))?;

        match updated {
            Some(id) => self.get_by_id(id).await,
            None => Err(AppError::NotFound(format!("Book {} not found", id))),
        }
    }

    /// Delete a book
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }

    /// All available books, most recent first
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b JOIN authors a ON a.id = b.author_id \
             WHERE b.is_available ORDER BY b.published_date DESC",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Flip the availability flag, returning the new value
    pub async fn toggle_availability(&self, id: i32) -> AppResult<bool> {
        sqlx::query_scalar(
            "UPDATE books SET is_available = NOT is_available WHERE id = $1 \
             RETURNING is_available",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Set availability across a selection of books in one update,
    /// returning the number of rows touched.
    pub async fn set_availability(&self, ids: &[i32], is_available: bool) -> AppResult<u64> {
        let result = sqlx::query("UPDATE books SET is_available = $1 WHERE id = ANY($2)")
            .bind(is_available)
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_whitelist_falls_back_to_published_date_desc() {
        assert_eq!(order_clause(Some("title")), "b.title ASC");
        assert_eq!(order_clause(Some("-title")), "b.title DESC");
        assert_eq!(order_clause(Some("published_date")), "b.published_date ASC");
        assert_eq!(order_clause(Some("-published_date")), "b.published_date DESC");
        assert_eq!(order_clause(None), "b.published_date DESC");
        assert_eq!(order_clause(Some("nonsense")), "b.published_date DESC");
    }

    #[test]
    fn filters_are_bound_not_spliced() {
        let query = BookQuery {
            search: Some("Rowling".to_string()),
            author: Some(3),
            is_available: Some(true),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books b");
        push_filters(&mut builder, &query);
        let sql = builder.sql();

        assert!(!sql.contains("Rowling"));
        assert!(sql.contains("b.title ILIKE $1"));
        assert!(sql.contains("a.name ILIKE $2"));
        assert!(sql.contains("b.author_id = $3"));
        assert!(sql.contains("b.is_available = $4"));
    }
}
