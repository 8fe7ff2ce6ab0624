//! Book list and detail pages

use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::error::AppResult;

use super::{escape, layout};

/// Book list page. Shows available books only, most recent first.
pub async fn book_list(State(state): State<crate::AppState>) -> AppResult<Html<String>> {
    let books = state.services.books.available().await?;

    let mut body = String::from(
        "<table><tr><th>Title</th><th>Author</th><th>Published</th></tr>",
    );
    for book in &books {
        body.push_str(&format!(
            "<tr><td><a href=\"/books/{id}/\">{title}</a></td>\
             <td><a href=\"/authors/{author}/\">{author_name}</a></td>\
             <td>{published}</td></tr>",
            id = book.id,
            title = escape(&book.title),
            author = book.author,
            author_name = escape(&book.author_name),
            published = book.published_date,
        ));
    }
    body.push_str("</table>");
    if books.is_empty() {
        body.push_str("<p>No books are currently available.</p>");
    }

    Ok(layout("Available books", &body))
}

/// Book detail page. Shows the book whether or not it is available.
pub async fn book_detail(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let book = state.services.books.get(id).await?;

    let body = format!(
        "<dl>\
         <dt>Author</dt><dd><a href=\"/authors/{author}/\">{author_name}</a></dd>\
         <dt>Published</dt><dd>{published}</dd>\
         <dt>Available</dt><dd>{available}</dd>\
         <dt>Recent</dt><dd>{recent}</dd>\
         </dl>",
        author = book.author,
        author_name = escape(&book.author_name),
        published = book.published_date,
        available = if book.is_available { "yes" } else { "no" },
        recent = if book.is_recent() { "yes" } else { "no" },
    );

    Ok(layout(&book.title, &body))
}
