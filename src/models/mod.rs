//! Data models for Libretto

pub mod author;
pub mod book;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorStats};
pub use book::Book;
pub use user::{User, UserClaims};
