//! Error types for Libretto server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchRecord = 4,
    BadValue = 5,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Validation error on {field}: {message}")]
    FieldError { field: &'static str, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure attached to a single field
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        AppError::FieldError {
            field,
            message: message.into(),
        }
    }
}

/// Error response body.
///
/// Validation failures carry per-field messages in `fields`, keyed by the
/// offending field name.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

fn field_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            AppError::Authentication(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::NotAuthorized,
                msg.clone(),
                None,
            ),
            AppError::Authorization(msg) => (
                StatusCode::FORBIDDEN,
                ErrorCode::NotAuthorized,
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ErrorCode::NoSuchRecord, msg.clone(), None)
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                "Validation failed".to_string(),
                Some(field_messages(errors)),
            ),
            AppError::FieldError { field, message } => {
                let mut fields = BTreeMap::new();
                fields.insert(field.to_string(), vec![message.clone()]);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadValue,
                    "Validation failed".to_string(),
                    Some(fields),
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone(), None)
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
