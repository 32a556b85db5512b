#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    test, web, App,
};
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard::{
    auth::{AuthMiddleware, TokenSettings, MIN_BCRYPT_COST},
    models::{User, UserInput},
    routes, services,
    state::AppState,
    store::{MemoryStore, Store},
};

pub const ROOT_EMAIL: &str = "root@example.com";
pub const ROOT_PASSWORD: &str = "root-password";
pub const FAR_DEADLINE: &str = "2099-01-01";

pub fn test_state() -> web::Data<AppState> {
    state_with_store(Arc::new(MemoryStore::new()))
}

pub fn state_with_store(store: Arc<dyn Store>) -> web::Data<AppState> {
    web::Data::new(AppState::new(
        store,
        TokenSettings {
            secret: "integration-test-secret".to_string(),
            expiration_hours: 1,
        },
        MIN_BCRYPT_COST,
    ))
}

/// Builds the application the same way `main` does.
pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(state)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
            .default_service(web::to(routes::not_found)),
    )
    .await
}

/// Inserts a user straight into the store. Every API route except login needs
/// a token, so the first account has to exist before any request is made.
pub async fn seed_user(state: &AppState, name: &str, email: &str, password: &str) -> User {
    services::users::create(
        state.store(),
        UserInput {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            is_admin: true,
        },
        state.bcrypt_cost,
    )
    .await
    .expect("failed to seed user")
}

/// Sends `req` and returns the status with the parsed envelope.
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
        Value::String(String::from_utf8_lossy(&bytes).into_owned())
    });
    (status, body)
}

pub async fn login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["data"]["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub fn task_payload(title: &str, users_id: &[i32]) -> Value {
    json!({
        "title": title,
        "description": "Task created by the integration suite",
        "deadline": FAR_DEADLINE,
        "users_id": users_id,
    })
}

/// Ids of the users assigned to a serialized task, sorted.
pub fn assignee_ids(task: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = task["users"]
        .as_array()
        .map(|users| users.iter().filter_map(|u| u["id"].as_i64()).collect())
        .unwrap_or_default();
    ids.sort();
    ids
}
