//! Author list and detail pages

use axum::{
    extract::{Path, State},
    response::Html,
};

use crate::error::AppResult;

use super::{escape, layout};

/// Author list page, alphabetical by name
pub async fn author_list(State(state): State<crate::AppState>) -> AppResult<Html<String>> {
    let authors = state.services.authors.all().await?;

    let mut body = String::from("<table><tr><th>Name</th><th>Website</th></tr>");
    for author in &authors {
        let website = match &author.website {
            Some(url) => format!(
                "<a href=\"{url}\" rel=\"external\">{url}</a>",
                url = escape(url)
            ),
            None => String::new(),
        };
        body.push_str(&format!(
            "<tr><td><a href=\"/authors/{id}/\">{name}</a></td><td>{website}</td></tr>",
            id = author.id,
            name = escape(&author.name),
            website = website,
        ));
    }
    body.push_str("</table>");

    Ok(layout("Authors", &body))
}

/// Author detail page with the author's books
pub async fn author_detail(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let author = state.services.authors.get(id).await?;
    let books = state.services.authors.books(id).await?;

    let mut body = String::new();
    if let Some(ref bio) = author.bio {
        body.push_str(&format!("<p>{}</p>", escape(bio)));
    }
    if let Some(ref website) = author.website {
        body.push_str(&format!(
            "<p><a href=\"{url}\" rel=\"external\">{url}</a></p>",
            url = escape(website)
        ));
    }

    body.push_str("<h2>Books</h2><ul>");
    for book in &books {
        body.push_str(&format!(
            "<li><a href=\"/books/{id}/\">{title}</a> ({published}){note}</li>",
            id = book.id,
            title = escape(&book.title),
            published = book.published_date,
            note = if book.is_available {
                ""
            } else {
                " (unavailable)"
            },
        ));
    }
    body.push_str("</ul>");
    if books.is_empty() {
        body.push_str("<p>No books on record.</p>");
    }

    Ok(layout(&author.name, &body))
}
