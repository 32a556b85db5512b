use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AccessToken;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: i32,
    /// Id of the `access_tokens` row backing this token. Revoking the row
    /// invalidates the token even before it expires.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Signing secret and lifetime for issued tokens.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Signs a token for `access`, the row that will be stored alongside it.
///
/// Returns `AppError::InternalServerError` if encoding fails.
pub fn generate_token(settings: &TokenSettings, access: &AccessToken) -> Result<String, AppError> {
    let expiration = access.created_at + chrono::Duration::hours(settings.expiration_hours);

    let claims = Claims {
        sub: access.user_id,
        jti: access.id,
        iat: access.created_at.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies signature and expiry and decodes the claims.
///
/// Returns `AppError::Unauthorized` if the token is malformed, its signature is
/// invalid, or it has expired. Revocation is checked separately against the store.
pub fn verify_token(settings: &TokenSettings, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AppError::from)
}
