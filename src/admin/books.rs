//! Book administration pages
//!
//! Columns: title, author, published date, availability. Search box over
//! title and author name, an availability filter, and two selection-bound
//! bulk actions that set the flag across all checked rows in one update.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{BookQuery, CreateBook, UpdateBook},
    },
    pages::escape,
    AppState,
};

use super::{admin_layout, urlencode, StaffUser};

#[derive(Debug, Default, Deserialize)]
pub struct BookListParams {
    pub q: Option<String>,
    /// Availability filter: "true", "false" or absent for all
    pub is_available: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub title: String,
    pub author: i32,
    pub published_date: NaiveDate,
    /// Checkbox; present when checked
    pub is_available: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkActionForm {
    pub action: String,
    #[serde(default)]
    pub ids: Vec<i32>,
}

fn author_options(authors: &[Author], selected: Option<i32>) -> String {
    authors
        .iter()
        .map(|a| {
            format!(
                "<option value=\"{id}\"{sel}>{name}</option>",
                id = a.id,
                sel = if selected == Some(a.id) { " selected" } else { "" },
                name = escape(&a.name),
            )
        })
        .collect()
}

/// Book change list
pub async fn list(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Query(params): Query<BookListParams>,
) -> AppResult<Html<String>> {
    let availability = params
        .is_available
        .as_deref()
        .and_then(|v| v.parse::<bool>().ok());
    let query = BookQuery {
        search: params.q.clone(),
        is_available: availability,
        per_page: Some(100),
        ..Default::default()
    };
    let (books, count) = state.services.books.list(&query).await?;
    let authors = state.services.authors.all().await?;

    let filter_link = |label: &str, value: &str| {
        let q = params.q.as_deref().unwrap_or("");
        format!(
            "<a href=\"/admin/books/?q={q}{value}\">{label}</a>",
            q = urlencode(q),
            value = value,
            label = label,
        )
    };

    let mut body = format!(
        "<form method=\"get\">\
         <input name=\"q\" value=\"{q}\" placeholder=\"Search title or author\">\
         <button>Search</button></form>\
         <p>Filter by availability: {all} | {available} | {unavailable}</p>\
         <p>{count} book(s)</p>",
        q = escape(params.q.as_deref().unwrap_or("")),
        all = filter_link("All", ""),
        available = filter_link("Available", "&is_available=true"),
        unavailable = filter_link("Unavailable", "&is_available=false"),
        count = count,
    );

    body.push_str(
        "<form method=\"post\" action=\"/admin/books/bulk\">\
         <table><tr><th></th><th>Title</th><th>Author</th><th>Published</th><th>Available</th></tr>",
    );
    for book in &books {
        body.push_str(&format!(
            "<tr><td><input type=\"checkbox\" name=\"ids\" value=\"{id}\"></td>\
             <td><a href=\"/admin/books/{id}/\">{title}</a></td>\
             <td>{author_name}</td><td>{published}</td><td>{available}</td></tr>",
            id = book.id,
            title = escape(&book.title),
            author_name = escape(&book.author_name),
            published = book.published_date,
            available = if book.is_available { "yes" } else { "no" },
        ));
    }
    body.push_str(
        "</table>\
         <p class=\"actions\">\
         <select name=\"action\">\
         <option value=\"mark_unavailable\">Mark selected as unavailable</option>\
         <option value=\"mark_available\">Mark selected as available</option>\
         </select>\
         <button>Go</button></p>\
         </form>",
    );

    body.push_str(&format!(
        "<h2>Add book</h2>\
         <form method=\"post\" action=\"/admin/books/create\">\
         <p><label>Title <input name=\"title\"></label></p>\
         <p><label>Author <select name=\"author\">{options}</select></label></p>\
         <p><label>Published <input name=\"published_date\" type=\"date\"></label></p>\
         <p><label>Available <input name=\"is_available\" type=\"checkbox\" checked></label></p>\
         <p><button>Save</button></p>\
         </form>",
        options = author_options(&authors, None),
    ));

    Ok(admin_layout("Books", &body))
}

/// Create a book from the change-list form
pub async fn create(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    let data = CreateBook {
        title: form.title.trim().to_string(),
        author: form.author,
        published_date: form.published_date,
        is_available: form.is_available.is_some(),
    };
    state.services.books.create(&data).await?;
    Ok(Redirect::to("/admin/books/"))
}

/// Book edit form
pub async fn edit_form(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let book = state.services.books.get(id).await?;
    let authors = state.services.authors.all().await?;

    let body = format!(
        "<form method=\"post\" action=\"/admin/books/{id}/\">\
         <p><label>Title <input name=\"title\" value=\"{title}\"></label></p>\
         <p><label>Author <select name=\"author\">{options}</select></label></p>\
         <p><label>Published <input name=\"published_date\" type=\"date\" value=\"{published}\"></label></p>\
         <p><label>Available <input name=\"is_available\" type=\"checkbox\"{checked}></label></p>\
         <p><button>Save</button></p>\
         </form>",
        id = book.id,
        title = escape(&book.title),
        options = author_options(&authors, Some(book.author)),
        published = book.published_date,
        checked = if book.is_available { " checked" } else { "" },
    );
    let body = format!(
        "{form}\
         <form method=\"post\" action=\"/admin/books/{id}/delete\">\
         <p><button>Delete this book</button></p>\
         </form>",
        form = body,
        id = book.id,
    );

    Ok(admin_layout(&format!("Change book: {}", book.title), &body))
}

/// Apply the edit form
pub async fn update(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<BookForm>,
) -> AppResult<Redirect> {
    let data = UpdateBook {
        title: Some(form.title.trim().to_string()),
        author: Some(form.author),
        published_date: Some(form.published_date),
        // Checkbox semantics: unchecked means false, not "keep current"
        is_available: Some(form.is_available.is_some()),
    };
    state.services.books.update(id, &data).await?;
    Ok(Redirect::to("/admin/books/"))
}

/// Delete a book
pub async fn delete(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    match state.services.books.delete(id).await {
        Ok(()) => Redirect::to("/admin/books/").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Bulk availability update over the selected rows
pub async fn bulk_action(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Form(form): Form<BulkActionForm>,
) -> AppResult<Redirect> {
    let is_available = match form.action.as_str() {
        "mark_available" => true,
        "mark_unavailable" => false,
        other => {
            return Err(AppError::BadRequest(format!("Unknown action: {}", other)));
        }
    };
    state
        .services
        .books
        .set_availability(&form.ids, is_available)
        .await?;
    Ok(Redirect::to("/admin/books/"))
}
