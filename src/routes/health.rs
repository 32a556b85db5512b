use actix_web::{get, http::StatusCode, web, Responder};
use chrono::Utc;
use serde_json::json;

use crate::error::AppError;
use crate::response;
use crate::state::AppState;

/// Health check endpoint
///
/// Pings the store and returns the current timestamp.
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    state.store().ping().await?;
    Ok(response::success(
        StatusCode::OK,
        "ok",
        json!({ "timestamp": Utc::now() }),
    ))
}
