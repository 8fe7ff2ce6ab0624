//! Administrative console
//!
//! Staff-only HTML CRUD surface over the catalog. Access control is a signed
//! cookie carrying the same JWT claims as the API; anything short of a valid
//! staff session redirects to the login page instead of erroring.

pub mod authors;
pub mod books;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, State},
    http::request::Parts,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use crate::{models::user::UserClaims, pages::escape, AppState};

const ADMIN_COOKIE: &str = "libretto_admin";

/// Percent-encode a value for use inside a query string.
/// Everything outside the unreserved set is encoded byte-wise.
pub fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Extractor for a staff session from the admin cookie.
///
/// Missing, invalid or non-staff sessions all redirect to the login page.
pub struct StaffUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = match CookieJar::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };

        let claims = jar
            .get(ADMIN_COOKIE)
            .and_then(|cookie| {
                UserClaims::from_token(cookie.value(), &state.config.auth.jwt_secret).ok()
            });

        match claims {
            Some(claims) if claims.is_staff => Ok(StaffUser(claims)),
            _ => Err(Redirect::to("/admin/login").into_response()),
        }
    }
}

/// Wrap admin page content in the console chrome
pub fn admin_layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Libretto administration</title>
<style>
body {{ font-family: sans-serif; margin: 2em auto; max-width: 60em; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4em 0.6em; text-align: left; }}
nav a {{ margin-right: 1em; }}
form.inline {{ display: inline; }}
.actions {{ margin: 1em 0; }}
</style>
</head>
<body>
<nav>
<a href="/admin/">Home</a>
<a href="/admin/authors/">Authors</a>
<a href="/admin/books/">Books</a>
<form class="inline" method="post" action="/admin/logout"><button>Log out</button></form>
</nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    ))
}

/// Admin index page
pub async fn index(StaffUser(claims): StaffUser) -> Html<String> {
    let body = format!(
        "<p>Signed in as <strong>{}</strong>.</p>\
         <ul>\
         <li><a href=\"/admin/authors/\">Authors</a></li>\
         <li><a href=\"/admin/books/\">Books</a></li>\
         </ul>",
        escape(&claims.sub)
    );
    admin_layout("Site administration", &body)
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Login form page
pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    let error = if query.error.is_some() {
        "<p><strong>Invalid credentials or not a staff account.</strong></p>"
    } else {
        ""
    };
    let body = format!(
        "{error}\
         <form method=\"post\" action=\"/admin/login\">\
         <p><label>Username <input name=\"username\" autofocus></label></p>\
         <p><label>Password <input name=\"password\" type=\"password\"></label></p>\
         <p><button>Log in</button></p>\
         </form>",
        error = error
    );
    admin_layout("Log in", &body)
}

/// Login form submission. Only staff accounts get a session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let authenticated = state
        .services
        .auth
        .authenticate(&form.username, &form.password)
        .await;

    match authenticated {
        Ok((token, user)) if user.is_staff => {
            let cookie = Cookie::build((ADMIN_COOKIE, token))
                .path("/admin")
                .http_only(true)
                .build();
            (jar.add(cookie), Redirect::to("/admin/")).into_response()
        }
        _ => Redirect::to("/admin/login?error=1").into_response(),
    }
}

/// Clear the admin session and return to the login page
pub async fn logout(jar: CookieJar) -> Response {
    let cookie = Cookie::build((ADMIN_COOKIE, "")).path("/admin").build();
    (jar.remove(cookie), Redirect::to("/admin/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_passes_unreserved_characters() {
        assert_eq!(urlencode("Gaiman-2020_a.b~c"), "Gaiman-2020_a.b~c");
    }

    #[test]
    fn urlencode_escapes_query_delimiters() {
        assert_eq!(urlencode("a&b=c"), "a%26b%3Dc");
        assert_eq!(urlencode("one two"), "one%20two");
        assert_eq!(urlencode("100%"), "100%25");
    }

    #[test]
    fn urlencode_handles_multibyte_input() {
        assert_eq!(urlencode("café"), "caf%C3%A9");
    }
}
