use crate::auth::{generate_token, hash_password, verify_password, verify_token, AuthResponse, Claims};
use crate::error::AppError;
use crate::models::AccessToken;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Checks the credentials and issues a new bearer token.
///
/// Unknown email and wrong password fail identically so callers cannot tell
/// which addresses are registered.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<AuthResponse, AppError> {
    let record = match state.store().find_user_by_email(email).await? {
        Some(record) => record,
        None => {
            // Spend the same bcrypt work a real verification would.
            hash_password(password, state.bcrypt_cost)?;
            log::warn!("Login rejected: no account for the supplied email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    if !verify_password(password, &record.password)? {
        log::warn!("Login rejected for user {}: wrong password", record.user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access = AccessToken::issue(record.user.id);
    let token = generate_token(&state.tokens, &access)?;
    state.store().insert_token(&access).await?;

    log::info!("User {} logged in", record.user.id);
    Ok(AuthResponse {
        token,
        user: record.user,
    })
}

/// Revokes every token issued to the user.
pub async fn logout(state: &AppState, user_id: i32) -> Result<u64, AppError> {
    let revoked = state.store().revoke_tokens(user_id).await?;
    log::info!("User {} logged out, {} token(s) revoked", user_id, revoked);
    Ok(revoked)
}

/// Resolves a bearer token into its claims. Fails with `Unauthorized` when the
/// token is invalid, expired, or has been revoked.
pub async fn authenticate(state: &AppState, token: &str) -> Result<Claims, AppError> {
    let claims = verify_token(&state.tokens, token)?;
    if !state.store().token_is_active(claims.jti, claims.sub).await? {
        return Err(AppError::Unauthorized("Token has been revoked".into()));
    }
    Ok(claims)
}
