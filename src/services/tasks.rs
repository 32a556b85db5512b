use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Task, TaskFields, TaskWithUsers, UserSummary};
use crate::store::Store;

/// Creates the task and its assignments atomically.
pub async fn create(
    store: &dyn Store,
    fields: TaskFields,
    user_ids: Vec<i32>,
) -> Result<TaskWithUsers, AppError> {
    let task = store.create_task(&fields, &user_ids).await?;
    log::info!("Task {} created with {} assignee(s)", task.id, user_ids.len());
    with_users(store, task).await
}

/// Replaces the task's fields and its whole assignee set.
pub async fn update(
    store: &dyn Store,
    task_id: i32,
    fields: TaskFields,
    user_ids: Vec<i32>,
) -> Result<TaskWithUsers, AppError> {
    let task = store
        .update_task(task_id, &fields, &user_ids)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {}", task_id)))?;
    log::info!("Task {} updated, assignees now {:?}", task.id, user_ids);
    with_users(store, task).await
}

/// Closes the task.
pub async fn mark_completed(store: &dyn Store, task_id: i32) -> Result<TaskWithUsers, AppError> {
    let task = store
        .set_task_status(task_id, false)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {}", task_id)))?;
    log::info!("Task {} marked as completed", task.id);
    with_users(store, task).await
}

/// Deletes the task and its assignments. Nothing is touched when the task is absent.
pub async fn delete(store: &dyn Store, task_id: i32) -> Result<(), AppError> {
    if !store.delete_task(task_id).await? {
        return Err(AppError::NotFound(format!("task {}", task_id)));
    }
    log::info!("Task {} deleted", task_id);
    Ok(())
}

pub async fn list_all_with_users(store: &dyn Store) -> Result<Vec<TaskWithUsers>, AppError> {
    let tasks = store.list_tasks().await?;
    attach_users(store, tasks).await
}

/// Rejects assignee ids with no matching user, naming the offending ids.
pub async fn ensure_users_exist(store: &dyn Store, user_ids: &[i32]) -> Result<(), AppError> {
    let existing = store.existing_user_ids(user_ids).await?;
    let missing: Vec<String> = user_ids
        .iter()
        .filter(|id| !existing.contains(*id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "users_id: the selected user(s) {} do not exist",
            missing.join(", ")
        )))
    }
}

async fn with_users(store: &dyn Store, task: Task) -> Result<TaskWithUsers, AppError> {
    let mut tasks = attach_users(store, vec![task]).await?;
    tasks
        .pop()
        .ok_or_else(|| AppError::InternalServerError("task vanished while loading assignees".into()))
}

/// Loads the assignees of `tasks` in one store call and pairs them up,
/// keeping the order of `tasks`.
pub(crate) async fn attach_users(
    store: &dyn Store,
    tasks: Vec<Task>,
) -> Result<Vec<TaskWithUsers>, AppError> {
    if tasks.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = tasks.iter().map(|task| task.id).collect();
    let mut by_task: HashMap<i32, Vec<UserSummary>> = HashMap::new();
    for (task_id, user) in store.assignees(&ids).await? {
        by_task.entry(task_id).or_default().push(user);
    }

    Ok(tasks
        .into_iter()
        .map(|task| {
            let users = by_task.remove(&task.id).unwrap_or_default();
            TaskWithUsers { task, users }
        })
        .collect())
}
