use crate::auth::hash_password;
use crate::error::AppError;
use crate::models::page::DEFAULT_PAGE_SIZE;
use crate::models::{NewUser, Page, User, UserInput, UserSummary, UserTasks};
use crate::store::Store;

use super::tasks::attach_users;

/// Registers a user. The password is hashed before it reaches the store.
pub async fn create(store: &dyn Store, input: UserInput, bcrypt_cost: u32) -> Result<User, AppError> {
    if store.email_exists(&input.email).await? {
        return Err(AppError::ValidationError(
            "The email has already been taken".into(),
        ));
    }

    let password_hash = hash_password(&input.password, bcrypt_cost)?;
    let user = store
        .create_user(NewUser {
            name: input.name,
            email: input.email,
            password_hash,
            is_admin: input.is_admin,
        })
        .await?;

    log::info!("User {} registered", user.id);
    Ok(user)
}

/// One page of users in insertion order, `DEFAULT_PAGE_SIZE` per page.
pub async fn list_paginated(store: &dyn Store, page: i64) -> Result<Page<User>, AppError> {
    let page = Page::<User>::clamp_page(page, DEFAULT_PAGE_SIZE);
    let total = store.count_users().await?;
    let users = store
        .list_users(DEFAULT_PAGE_SIZE, Page::<User>::offset(page, DEFAULT_PAGE_SIZE))
        .await?;
    Ok(Page::new(users, page, DEFAULT_PAGE_SIZE, total))
}

pub async fn list_all(store: &dyn Store) -> Result<Vec<UserSummary>, AppError> {
    store.list_user_summaries().await
}

/// The user's tasks with their assignees. An unknown user is `NotFound`; a
/// known user without tasks gets an empty list.
pub async fn list_tasks_for_user(store: &dyn Store, user_id: i32) -> Result<UserTasks, AppError> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

    let tasks = store.list_tasks_for_user(user.id).await?;
    Ok(UserTasks {
        id: user.id,
        name: user.name,
        tasks: attach_users(store, tasks).await?,
    })
}

pub async fn delete(store: &dyn Store, user_id: i32) -> Result<(), AppError> {
    if !store.delete_user(user_id).await? {
        return Err(AppError::NotFound(format!("user {}", user_id)));
    }
    log::info!("User {} deleted", user_id);
    Ok(())
}
