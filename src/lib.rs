//! Libretto Library Catalog Server
//!
//! A Rust implementation of the Libretto library catalog, providing a REST
//! JSON API, server-rendered catalog pages and an administrative console
//! for managing authors and books.

use std::sync::Arc;

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pages;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
