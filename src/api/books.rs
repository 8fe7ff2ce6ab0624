//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
};

use super::{AuthenticatedUser, PaginatedResponse};

/// Response body for the availability toggle
#[derive(Serialize, ToSchema)]
pub struct ToggleResponse {
    pub id: i32,
    /// The new availability value after the flip
    pub is_available: bool,
}

/// List books with search, filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Paginated book list", body = PaginatedBooks)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let (books, count) = state.services.books.list(&query).await?;
    Ok(Json(PaginatedResponse::new(
        books,
        count,
        query.page(),
        query.per_page(),
    )))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.create(&data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id).await?;
    Ok(Json(book))
}

/// Update a book (full or partial; absent fields are kept)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.update(id, &data).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All currently available books
#[utoipa::path(
    get,
    path = "/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Available books", body = Vec<Book>)
    )
)]
pub async fn available_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.available().await?;
    Ok(Json(books))
}

/// Flip a book's availability flag
#[utoipa::path(
    post,
    path = "/books/{id}/toggle_availability",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Availability toggled", body = ToggleResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn toggle_availability(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ToggleResponse>> {
    let is_available = state.services.books.toggle_availability(id).await?;
    Ok(Json(ToggleResponse { id, is_available }))
}
