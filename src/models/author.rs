//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
    /// Short biography of the author
    pub bio: Option<String>,
    /// Link to the author's official website
    pub website: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: String,
    pub bio: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub website: Option<String>,
}

/// Update author request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    pub bio: Option<String>,
    #[validate(url(message = "Enter a valid URL."))]
    pub website: Option<String>,
}

/// Query parameters for listing authors
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AuthorQuery {
    /// Free-text search over name and bio
    pub search: Option<String>,
    /// Ordering: `name` or `-name` (default: `name`)
    pub ordering: Option<String>,
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Results per page (default: 20, max: 100)
    pub per_page: Option<i64>,
}

impl AuthorQuery {
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

/// Per-author aggregation of book counts
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AuthorStats {
    pub name: String,
    pub total_books: i64,
    pub available_books: i64,
}
