use crate::{
    error::AppError,
    models::UserInput,
    response, services,
    state::AppState,
};
use actix_web::{delete, get, http::StatusCode, post, web, Responder};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Registers a new user.
///
/// ## Responses:
/// - `201 Created`: the user, without its password.
/// - `422 Unprocessable Entity`: invalid fields or an email that is already taken.
#[post("/store")]
pub async fn store(
    state: web::Data<AppState>,
    user_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let user = services::users::create(state.store(), user_data.into_inner(), state.bcrypt_cost).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "User registered successfully",
        user,
    ))
}

/// Lists users twenty at a time; `?page=N` selects the page (default 1).
#[get("/get_all_users_paginate")]
pub async fn get_all_users_paginate(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, AppError> {
    let page = services::users::list_paginated(state.store(), query.page.unwrap_or(1)).await?;
    Ok(response::success(StatusCode::OK, "List of users", page))
}

/// Lists every user as `{id, name}`.
#[get("/get_all_users")]
pub async fn get_all_users(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let users = services::users::list_all(state.store()).await?;
    Ok(response::success(StatusCode::OK, "List of users", users))
}

/// Lists the tasks assigned to user `{id}`, each with all of its assignees.
///
/// ## Responses:
/// - `200 OK`: `{id, name, tasks}`; `tasks` is empty for a user without tasks.
/// - `404 Not Found`: no user with that id.
#[get("/get_tasks_user/{id}")]
pub async fn get_tasks_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user_tasks = services::users::list_tasks_for_user(state.store(), user_id.into_inner()).await?;
    Ok(response::success(StatusCode::OK, "List of user tasks", user_tasks))
}

#[delete("/delete/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    services::users::delete(state.store(), user_id.into_inner()).await?;
    Ok(response::success(StatusCode::OK, "User deleted", true))
}
