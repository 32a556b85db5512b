use crate::{
    auth::{AuthenticatedUser, LoginRequest},
    error::AppError,
    response, services,
    state::AppState,
};
use actix_web::{http::StatusCode, post, web, Responder};
use validator::Validate;

/// Login user
///
/// Checks the credentials and returns a new bearer token with the user.
///
/// ## Responses:
/// - `200 OK`: `{token, user}` in `data`.
/// - `401 Unauthorized`: unknown email or wrong password (same message for both).
/// - `422 Unprocessable Entity`: malformed email or missing fields.
#[post("/auth")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let session = services::auth::login(&state, &login_data.email, &login_data.password).await?;
    Ok(response::success(StatusCode::OK, "Session started", session))
}

/// Logout user
///
/// Revokes every token issued to the authenticated user, including the one
/// used for this request.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    services::auth::logout(&state, user.id).await?;
    Ok(response::message(StatusCode::OK, "Session ended"))
}
