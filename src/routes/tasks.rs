use crate::{
    error::AppError,
    models::TaskInput,
    response, services,
    state::AppState,
};
use actix_web::{delete, get, http::StatusCode, patch, post, put, web, Responder};
use validator::Validate;

/// Shape checks first, then the assignee ids against the store.
/// Nothing is written when either fails.
async fn validate_task_input(state: &AppState, input: &TaskInput) -> Result<(), AppError> {
    input.validate()?;
    services::tasks::ensure_users_exist(state.store(), &input.users_id).await
}

/// Lists every task with its assignees as `{id, name}`.
#[get("")]
pub async fn index(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let tasks = services::tasks::list_all_with_users(state.store()).await?;
    Ok(response::success(StatusCode::OK, "Task list", tasks))
}

/// Creates a task and assigns it to every id in `users_id`.
///
/// ## Request Body:
/// - `title`: required, at most 255 characters.
/// - `description`: required.
/// - `deadline`: required `YYYY-MM-DD`, strictly after today.
/// - `users_id`: required non-empty list of existing user ids.
///
/// ## Responses:
/// - `201 Created`: the task with its `users`.
/// - `422 Unprocessable Entity`: any rule above is violated.
/// - `500 Internal Server Error`: the write failed and was rolled back.
#[post("/store")]
pub async fn store(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    validate_task_input(&state, &task_data).await?;

    let (fields, user_ids) = task_data.into_inner().into_parts();
    let task = services::tasks::create(state.store(), fields, user_ids).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "Task registered successfully",
        task,
    ))
}

/// Updates a task and replaces its assignees with `users_id`.
///
/// Same body as `store`, plus an optional boolean `status`.
///
/// ## Responses:
/// - `201 Created`: the updated task with its `users`.
/// - `404 Not Found`: no task with that id.
/// - `422 Unprocessable Entity`: invalid body; the task is left untouched.
/// - `500 Internal Server Error`: the write failed and was rolled back.
#[put("/update/{task}")]
pub async fn update(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    validate_task_input(&state, &task_data).await?;

    let (fields, user_ids) = task_data.into_inner().into_parts();
    let task = services::tasks::update(state.store(), task_id.into_inner(), fields, user_ids).await?;
    Ok(response::success(
        StatusCode::CREATED,
        "Task updated successfully",
        task,
    ))
}

/// Marks a task as completed.
#[patch("/complete/{task}")]
pub async fn complete(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = services::tasks::mark_completed(state.store(), task_id.into_inner()).await?;
    Ok(response::success(StatusCode::OK, "Task completed", task))
}

/// Deletes a task together with its assignments.
#[delete("/delete/{task}")]
pub async fn destroy(
    state: web::Data<AppState>,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    services::tasks::delete(state.store(), task_id.into_inner()).await?;
    Ok(response::success(StatusCode::CREATED, "Task deleted", true))
}
