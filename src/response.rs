//! The uniform `{status, message, data}` envelope wrapped around every response.

use actix_web::{http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `true` for successful outcomes, `false` for every error.
    pub status: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: true,
            message: message.into(),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Builds a successful response carrying `data`.
pub fn success<T: Serialize>(code: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(code).json(Envelope::success(message, Some(data)))
}

/// Builds a successful response without a `data` member.
pub fn message(code: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(code).json(Envelope::<()>::success(message, None))
}
