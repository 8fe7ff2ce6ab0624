//! Author administration pages
//!
//! Columns: name, website. Search box over the name field.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::author::{AuthorQuery, CreateAuthor, UpdateAuthor},
    pages::escape,
    AppState,
};

use super::{admin_layout, StaffUser};

#[derive(Debug, Default, Deserialize)]
pub struct AuthorListParams {
    pub q: Option<String>,
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthorForm {
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub website: String,
}

/// Author change list
pub async fn list(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Query(params): Query<AuthorListParams>,
) -> AppResult<Html<String>> {
    let query = AuthorQuery {
        search: params.q.clone(),
        per_page: Some(100),
        ..Default::default()
    };
    let (authors, count) = state.services.authors.list(&query).await?;

    let mut body = format!(
        "<form method=\"get\">\
         <input name=\"q\" value=\"{q}\" placeholder=\"Search authors\">\
         <button>Search</button></form>\
         <p>{count} author(s)</p>\
         <table><tr><th>Name</th><th>Website</th><th></th></tr>",
        q = escape(params.q.as_deref().unwrap_or("")),
        count = count,
    );
    for author in &authors {
        body.push_str(&format!(
            "<tr><td><a href=\"/admin/authors/{id}/\">{name}</a></td>\
             <td>{website}</td>\
             <td><form class=\"inline\" method=\"post\" action=\"/admin/authors/{id}/delete\">\
             <button>Delete</button></form></td></tr>",
            id = author.id,
            name = escape(&author.name),
            website = escape(author.website.as_deref().unwrap_or("")),
        ));
    }
    body.push_str("</table>");

    body.push_str(
        "<h2>Add author</h2>\
         <form method=\"post\" action=\"/admin/authors/create\">\
         <p><label>Name <input name=\"name\"></label></p>\
         <p><label>Bio <textarea name=\"bio\"></textarea></label></p>\
         <p><label>Website <input name=\"website\"></label></p>\
         <p><button>Save</button></p>\
         </form>",
    );

    Ok(admin_layout("Authors", &body))
}

/// Create an author from the change-list form
pub async fn create(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Redirect> {
    let data = CreateAuthor {
        name: form.name.trim().to_string(),
        bio: blank_to_none(form.bio),
        website: blank_to_none(form.website),
    };
    state.services.authors.create(&data).await?;
    Ok(Redirect::to("/admin/authors/"))
}

/// Author edit form
pub async fn edit_form(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let author = state.services.authors.get(id).await?;

    let body = format!(
        "<form method=\"post\" action=\"/admin/authors/{id}/\">\
         <p><label>Name <input name=\"name\" value=\"{name}\"></label></p>\
         <p><label>Bio <textarea name=\"bio\">{bio}</textarea></label></p>\
         <p><label>Website <input name=\"website\" value=\"{website}\"></label></p>\
         <p><button>Save</button></p>\
         </form>",
        id = author.id,
        name = escape(&author.name),
        bio = escape(author.bio.as_deref().unwrap_or("")),
        website = escape(author.website.as_deref().unwrap_or("")),
    );

    Ok(admin_layout(&format!("Change author: {}", author.name), &body))
}

/// Apply the edit form
pub async fn update(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Redirect> {
    let data = UpdateAuthor {
        name: blank_to_none(form.name),
        bio: blank_to_none(form.bio),
        website: blank_to_none(form.website),
    };
    state.services.authors.update(id, &data).await?;
    Ok(Redirect::to("/admin/authors/"))
}

/// Delete an author (and, by cascade, their books)
pub async fn delete(
    StaffUser(_claims): StaffUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Response {
    match state.services.authors.delete(id).await {
        Ok(()) => Redirect::to("/admin/authors/").into_response(),
        Err(e) => e.into_response(),
    }
}
