//! Custom error types for the ledger service
//!
//! Rejected input is never an error here: store operations report it as
//! `Ok(false)` or `Ok(None)`. [`StoreError`] is reserved for storage faults.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Storage fault raised by the ledger store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Pool setup, migration or configuration failure
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Error occurred during query execution
    #[error("Database query error: {0}")]
    Query(#[from] sqlx::Error),

    /// A stored row that no longer matches the schema's expectations
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Custom error type for the HTTP surface
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, unknown or logged-out session
    #[error("Unauthorized")]
    Unauthorized,

    /// Wrong username or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Rejected input, with a message fit for the user
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Owned resource not found
    #[error("Not found")]
    NotFound,

    /// Too many failed attempts
    #[error("Too many requests")]
    TooManyRequests,

    /// Storage fault
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many attempts, try again later.".to_string(),
            ),
            ApiError::Store(e) => {
                tracing::error!("Store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
