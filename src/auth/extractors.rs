use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::Claims;
use crate::error::AppError;

/// The user behind the request's bearer token.
///
/// Only available on routes behind `AuthMiddleware`, which verifies the token
/// and stores its `Claims` in the request extensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i32,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser { id: claims.sub })),
            None => {
                let err = AppError::Unauthorized("Unauthenticated".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
