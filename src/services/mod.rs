//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod fixtures;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub fixtures: fixtures::FixturesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            fixtures: fixtures::FixturesService::new(repository),
        }
    }
}
