//! Author endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorQuery, AuthorStats, CreateAuthor, UpdateAuthor},
        book::Book,
    },
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List authors with search and pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Paginated author list", body = PaginatedAuthors)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<PaginatedResponse<Author>>> {
    let (authors, count) = state.services.authors.list(&query).await?;
    Ok(Json(PaginatedResponse::new(
        authors,
        count,
        query.page(),
        query.per_page(),
    )))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(data): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.authors.create(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Update an author (full or partial; absent fields are kept)
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.update(id, &data).await?;
    Ok(Json(author))
}

/// Delete an author; their books are deleted by cascade
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All books for a given author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books by this author", body = Vec<Book>),
        (status = 404, description = "Author not found")
    )
)]
pub async fn author_books(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.authors.books(id).await?;
    Ok(Json(books))
}

/// Total and available book counts for every author
#[utoipa::path(
    get,
    path = "/authors/stats",
    tag = "authors",
    responses(
        (status = 200, description = "Per-author book counts", body = Vec<AuthorStats>)
    )
)]
pub async fn author_stats(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<AuthorStats>>> {
    let stats = state.services.authors.stats().await?;
    Ok(Json(stats))
}
