//! Fixture loader
//!
//! Loads a JSON fixture file into the database in one transaction. Invoked
//! from the `seed` operator command; the caller reports success or the
//! error message, nothing more granular.

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    repository::Repository,
};

use super::auth::hash_password;

#[derive(Debug, Deserialize)]
pub struct FixtureUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_staff: bool,
}

#[derive(Debug, Deserialize)]
pub struct FixtureBook {
    pub title: String,
    pub published_date: chrono::NaiveDate,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct FixtureAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub books: Vec<FixtureBook>,
}

#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    #[serde(default)]
    pub authors: Vec<FixtureAuthor>,
}

/// Counts of records loaded from a fixture file
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub users: usize,
    pub authors: usize,
    pub books: usize,
}

#[derive(Clone)]
pub struct FixturesService {
    repository: Repository,
}

impl FixturesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Load a fixture file into the database
    pub async fn load(&self, path: &str) -> AppResult<LoadReport> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::BadRequest(format!("Cannot read {}: {}", path, e)))?;
        let fixture: FixtureFile = serde_json::from_str(&raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid fixture file {}: {}", path, e)))?;

        let mut report = LoadReport::default();

        for user in &fixture.users {
            let hash = hash_password(&user.password)?;
            self.repository
                .users
                .upsert(&user.username, &hash, user.is_staff)
                .await?;
            report.users += 1;
        }

        let mut tx = self.repository.pool.begin().await?;
        for author in &fixture.authors {
            let author_id: i32 = sqlx::query_scalar(
                "INSERT INTO authors (name, bio, website) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(&author.name)
            .bind(&author.bio)
            .bind(&author.website)
            .fetch_one(&mut *tx)
            .await?;
            report.authors += 1;

            for book in &author.books {
                sqlx::query(
                    "INSERT INTO books (title, author_id, published_date, is_available) \
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(&book.title)
                .bind(author_id)
                .bind(book.published_date)
                .bind(book.is_available)
                .execute(&mut *tx)
                .await?;
                report.books += 1;
            }
        }
        tx.commit().await?;

        tracing::info!(
            users = report.users,
            authors = report.authors,
            books = report.books,
            "Fixture data loaded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_file_parses_with_defaults() {
        let fixture: FixtureFile = serde_json::from_str(
            r#"{
                "users": [{"username": "admin", "password": "admin123", "is_staff": true}],
                "authors": [{
                    "name": "Neil Gaiman",
                    "bio": "British fantasy author",
                    "books": [
                        {"title": "American Gods", "published_date": "2001-06-19"},
                        {"title": "Coraline", "published_date": "2002-07-02", "is_available": false}
                    ]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(fixture.users.len(), 1);
        assert!(fixture.users[0].is_staff);
        assert_eq!(fixture.authors[0].books.len(), 2);
        assert!(fixture.authors[0].books[0].is_available);
        assert!(!fixture.authors[0].books[1].is_available);
        assert!(fixture.authors[0].website.is_none());
    }
}
