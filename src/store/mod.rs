//! Persistence behind a single async trait.
//!
//! `PgStore` talks to PostgreSQL through `sqlx`; `MemoryStore` keeps everything
//! in process. Every method that performs more than one write is atomic in
//! both implementations: either all of its steps are applied or none are.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AccessToken, NewUser, Task, TaskFields, User, UserRecord, UserSummary};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;

    // Users

    /// Inserts a user. A duplicate email is a `ValidationError`.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_user(&self, id: i32) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;
    /// Users ordered by id.
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;
    async fn list_user_summaries(&self) -> Result<Vec<UserSummary>, AppError>;
    /// The subset of `ids` that belong to existing users.
    async fn existing_user_ids(&self, ids: &[i32]) -> Result<Vec<i32>, AppError>;
    /// Removes a user along with its assignments and tokens. `false` when absent.
    async fn delete_user(&self, id: i32) -> Result<bool, AppError>;

    // Tasks

    /// Inserts the task and one assignment per user id in one transaction.
    async fn create_task(&self, fields: &TaskFields, user_ids: &[i32]) -> Result<Task, AppError>;
    /// Updates the scalar columns, deletes every assignment of the task and
    /// inserts `user_ids`, in one transaction. `None` when the task is absent.
    async fn update_task(
        &self,
        id: i32,
        fields: &TaskFields,
        user_ids: &[i32],
    ) -> Result<Option<Task>, AppError>;
    async fn set_task_status(&self, id: i32, status: bool) -> Result<Option<Task>, AppError>;
    /// Deletes the task's assignments, then the task, in one transaction.
    /// `false` (and nothing deleted) when the task is absent.
    async fn delete_task(&self, id: i32) -> Result<bool, AppError>;
    /// Tasks ordered by id.
    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;
    async fn list_tasks_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError>;
    /// `(task_id, assignee)` pairs for the given tasks, ordered by task then user id.
    async fn assignees(&self, task_ids: &[i32]) -> Result<Vec<(i32, UserSummary)>, AppError>;

    // Access tokens

    async fn insert_token(&self, token: &AccessToken) -> Result<(), AppError>;
    /// Whether token `id` is still issued to `user_id`.
    async fn token_is_active(&self, id: Uuid, user_id: i32) -> Result<bool, AppError>;
    /// Deletes every token of the user and returns how many were revoked.
    async fn revoke_tokens(&self, user_id: i32) -> Result<u64, AppError>;
}
