//!
//! # Custom Error Handling
//!
//! This module defines the `AppError` type returned by every service and handler.
//! Each variant maps to exactly one HTTP status, and every error renders itself
//! as the same JSON envelope the successful responses use (`status: false`).
//!
//! Internal causes (database messages, hashing failures) are logged when the
//! response is built and never leave the process.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;
use validator::ValidationErrors;

use crate::response::Envelope;

/// Message returned for every not-found condition, whatever the resource.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";

const PERSISTENCE_MESSAGE: &str = "The operation could not be completed.";
const INTERNAL_MESSAGE: &str = "An unexpected error occurred.";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed, missing or referentially invalid input (HTTP 422).
    /// Raised before any write reaches the store.
    ValidationError(String),
    /// Bad credentials or a missing, expired or revoked token (HTTP 401).
    Unauthorized(String),
    /// A referenced entity does not exist (HTTP 404).
    /// The payload is a detail for the logs; clients always get `NOT_FOUND_MESSAGE`.
    NotFound(String),
    /// A write against the store failed and was rolled back (HTTP 500).
    PersistenceError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl AppError {
    /// The message exposed to the caller inside the envelope.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::ValidationError(msg) | AppError::Unauthorized(msg) => msg,
            AppError::NotFound(_) => NOT_FOUND_MESSAGE,
            AppError::PersistenceError(_) => PERSISTENCE_MESSAGE,
            AppError::InternalServerError(_) => INTERNAL_MESSAGE,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::PersistenceError(msg) => write!(f, "Persistence Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PersistenceError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::PersistenceError(_) | AppError::InternalServerError(_) => {
                log::error!("{}", self)
            }
            AppError::NotFound(_) => log::debug!("{}", self),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(Envelope::<()>::failure(self.public_message()))
    }
}

/// `RowNotFound` becomes `NotFound`; every other database failure is a
/// `PersistenceError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::PersistenceError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
