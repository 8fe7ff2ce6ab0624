//! Server-rendered catalog pages
//!
//! Read-only HTML list/detail views over the same data layer as the API.
//! Markup is assembled by hand; every user-supplied value goes through
//! [`escape`] before it reaches a page.

pub mod authors;
pub mod books;

use axum::response::Html;

/// Escape a value for inclusion in HTML text or attribute content
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared chrome
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Libretto</title>
<style>
body {{ font-family: sans-serif; margin: 2em auto; max-width: 50em; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid #ccc; padding: 0.4em 0.6em; text-align: left; }}
nav a {{ margin-right: 1em; }}
</style>
</head>
<body>
<nav><a href="/books/">Books</a><a href="/authors/">Authors</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("Simon & Schuster"), "Simon &amp; Schuster");
        assert_eq!(escape("O'Brien"), "O&#x27;Brien");
    }

    #[test]
    fn layout_escapes_title_but_not_body() {
        let Html(page) = layout("<Books>", "<p>ok</p>");
        assert!(page.contains("&lt;Books&gt;"));
        assert!(page.contains("<p>ok</p>"));
    }
}
