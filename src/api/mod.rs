//! API handlers for Libretto REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token.
///
/// Read endpoints are open; handlers that mutate data take this extractor,
/// which rejects missing or invalid bearer tokens with 401.
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        if !auth_header.starts_with("Bearer ") {
            return Err(AppError::Authentication(
                "Invalid authorization header format".to_string(),
            ));
        }

        let token = &auth_header[7..];

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Paginated response envelope
#[derive(Serialize, ToSchema)]
#[aliases(PaginatedAuthors = PaginatedResponse<crate::models::Author>,
          PaginatedBooks = PaginatedResponse<crate::models::Book>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Page of results
    pub results: Vec<T>,
    /// Total number of matching records
    pub count: i64,
    /// Current page number
    pub page: i64,
    /// Results per page
    pub per_page: i64,
    /// Next page number, when one exists
    pub next: Option<i64>,
    /// Previous page number, when one exists
    pub previous: Option<i64>,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(results: Vec<T>, count: i64, page: i64, per_page: i64) -> Self {
        let next = if page * per_page < count {
            Some(page + 1)
        } else {
            None
        };
        let previous = if page > 1 { Some(page - 1) } else { None };
        Self {
            results,
            count,
            page,
            per_page,
            next,
            previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, ToSchema)]
    struct Row;

    fn envelope(len: usize, count: i64, page: i64) -> PaginatedResponse<Row> {
        PaginatedResponse::new((0..len).map(|_| Row).collect(), count, page, 20)
    }

    #[test]
    fn single_page_has_no_links() {
        let p = envelope(5, 5, 1);
        assert_eq!(p.next, None);
        assert_eq!(p.previous, None);
    }

    #[test]
    fn middle_page_links_both_ways() {
        let p = envelope(20, 50, 2);
        assert_eq!(p.next, Some(3));
        assert_eq!(p.previous, Some(1));
    }

    #[test]
    fn last_page_only_links_back() {
        let p = envelope(10, 50, 3);
        assert_eq!(p.next, None);
        assert_eq!(p.previous, Some(2));
    }
}
