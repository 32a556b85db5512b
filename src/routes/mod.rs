pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::{web, HttpRequest};

use crate::error::AppError;

/// Registers the versioned API. Callers mount it under `/api` behind `AuthMiddleware`.
///
/// Extractor failures are routed through `AppError` so they share the envelope:
/// bad bodies and query strings are validation errors, unparsable path ids are
/// not-found.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::NotFound(err.to_string()).into()
    }))
    .service(
        web::scope("/v1")
            .service(auth::login)
            .service(auth::logout)
            .service(
                web::scope("/users")
                    .service(users::store)
                    .service(users::get_all_users_paginate)
                    .service(users::get_all_users)
                    .service(users::get_tasks_user)
                    .service(users::delete_user),
            )
            .service(
                web::scope("/tasks")
                    .service(tasks::index)
                    .service(tasks::store)
                    .service(tasks::update)
                    .service(tasks::complete)
                    .service(tasks::destroy),
            ),
    );
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> Result<&'static str, AppError> {
    Err(AppError::NotFound(format!("no route for {}", req.path())))
}
