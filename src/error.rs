//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler returns `Result<_, AppError>`, and `AppError` implements
//! `actix_web::error::ResponseError` so each variant becomes an HTTP response with a
//! JSON body of the form `{"detail": "..."}`.
//!
//! Server-side faults (storage, hashing, token signing) are logged with their full text
//! but reach the client only as an opaque "Internal server error".

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing, invalid, expired or inactive credential (HTTP 401).
    /// The message is deliberately uniform so clients cannot tell the cases apart.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed or out-of-range request parameters (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Uniqueness violation on signup (HTTP 400).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Ownership-filtered absence (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Body failed `validator` rules (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    Validation(String),
    /// Unexpected persistence fault (HTTP 500).
    #[error("Store Error: {0}")]
    Store(#[from] StoreError),
    /// Any other unexpected server-side error (HTTP 500).
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

const OPAQUE_SERVER_ERROR: &str = "Internal server error";

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            AppError::Unauthorized(msg) => builder
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({ "detail": msg })),
            AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg) => builder.json(json!({ "detail": msg })),
            AppError::Store(_) | AppError::Internal(_) => {
                log::error!("{}", self);
                builder.json(json!({ "detail": OPAQUE_SERVER_ERROR }))
            }
        }
    }
}

/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}
