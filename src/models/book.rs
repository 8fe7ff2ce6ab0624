//! Book model and related types
//!
//! The API exposes a single book representation: the stored columns plus
//! the author's name joined in at read time.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book as served by the API: stored fields plus the joined author name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Author id
    pub author: i32,
    /// Author name, joined at read time
    pub author_name: String,
    pub published_date: NaiveDate,
    pub is_available: bool,
}

impl Book {
    /// A book is recent when it was published in 2020 or later.
    /// Derived at read time, never persisted.
    pub fn is_recent(&self) -> bool {
        self.published_date.year() >= 2020
    }
}

fn default_true() -> bool {
    true
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters."))]
    pub title: String,
    /// Author id the book belongs to
    pub author: i32,
    pub published_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Update book request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters."))]
    pub title: Option<String>,
    pub author: Option<i32>,
    pub published_date: Option<NaiveDate>,
    pub is_available: Option<bool>,
}

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    /// Free-text search over title and author name
    pub search: Option<String>,
    /// Filter by author id
    pub author: Option<i32>,
    /// Filter by availability
    pub is_available: Option<bool>,
    /// Ordering: `title`, `-title`, `published_date` or `-published_date`
    /// (default: `-published_date`)
    pub ordering: Option<String>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Results per page (default: 20, max: 100)
    pub per_page: Option<i64>,
}

impl BookQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn book(date: NaiveDate) -> Book {
        Book {
            id: 1,
            title: "American Gods".to_string(),
            author: 1,
            author_name: "Neil Gaiman".to_string(),
            published_date: date,
            is_available: true,
        }
    }

    #[test]
    fn book_published_2020_or_later_is_recent() {
        let b = book(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!(b.is_recent());

        let b = book(NaiveDate::from_ymd_opt(2023, 6, 19).unwrap());
        assert!(b.is_recent());
    }

    #[test]
    fn book_published_before_2020_is_not_recent() {
        let b = book(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        assert!(!b.is_recent());

        let b = book(NaiveDate::from_ymd_opt(2001, 6, 19).unwrap());
        assert!(!b.is_recent());
    }

    #[test]
    fn create_book_defaults_to_available() {
        let data: CreateBook = serde_json::from_str(
            r#"{"title": "Coraline", "author": 1, "published_date": "2002-07-02"}"#,
        )
        .unwrap();
        assert!(data.is_available);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn create_book_rejects_blank_title() {
        let data = CreateBook {
            title: String::new(),
            author: 1,
            published_date: NaiveDate::from_ymd_opt(2002, 7, 2).unwrap(),
            is_available: true,
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
