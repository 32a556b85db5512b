use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{AccessToken, NewUser, Task, TaskFields, User, UserRecord, UserSummary};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, UserRecord>,
    tasks: BTreeMap<i32, Task>,
    /// `(task_id, user_id)` pairs.
    assignments: BTreeSet<(i32, i32)>,
    tokens: HashMap<Uuid, AccessToken>,
    last_user_id: i32,
    last_task_id: i32,
}

impl Tables {
    /// Mirrors the `user_task.user_id` foreign key: refuses ids with no user row.
    fn check_users_exist(&self, user_ids: &[i32]) -> Result<(), AppError> {
        match user_ids.iter().find(|id| !self.users.contains_key(*id)) {
            Some(missing) => Err(AppError::PersistenceError(format!(
                "user_task references missing user {}",
                missing
            ))),
            None => Ok(()),
        }
    }

    fn replace_assignments(&mut self, task_id: i32, user_ids: &[i32]) {
        self.assignments.retain(|(task, _)| *task != task_id);
        for &user_id in user_ids {
            self.assignments.insert((task_id, user_id));
        }
    }
}

/// In-process `Store` for development and tests.
///
/// Each multi-step write takes the write lock once and validates everything
/// before touching any table, so a failing write leaves no trace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.user.email == user.email) {
            return Err(AppError::ValidationError(
                "The email has already been taken".into(),
            ));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: tables.last_user_id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(
            created.id,
            UserRecord {
                user: created.clone(),
                password: user.password_hash,
            },
        );
        Ok(created)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(|record| record.user.clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|record| record.user.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|record| record.user.email == email))
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|record| record.user.clone())
            .collect())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.len() as i64)
    }

    async fn list_user_summaries(&self) -> Result<Vec<UserSummary>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .map(|record| UserSummary::from(&record.user))
            .collect())
    }

    async fn existing_user_ids(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let tables = self.tables.read().await;
        let found: BTreeSet<i32> = ids
            .iter()
            .copied()
            .filter(|id| tables.users.contains_key(id))
            .collect();
        Ok(found.into_iter().collect())
    }

    async fn delete_user(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.assignments.retain(|(_, user)| *user != id);
        tables.tokens.retain(|_, token| token.user_id != id);
        Ok(true)
    }

    async fn create_task(&self, fields: &TaskFields, user_ids: &[i32]) -> Result<Task, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_users_exist(user_ids)?;

        tables.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: tables.last_task_id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            status: true,
            deadline: fields.deadline,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(task.id, task.clone());
        tables.replace_assignments(task.id, user_ids);
        Ok(task)
    }

    async fn update_task(
        &self,
        id: i32,
        fields: &TaskFields,
        user_ids: &[i32],
    ) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&id) {
            return Ok(None);
        }
        tables.check_users_exist(user_ids)?;

        let updated = match tables.tasks.get_mut(&id) {
            Some(task) => {
                task.title = fields.title.clone();
                task.description = fields.description.clone();
                task.status = fields.status.unwrap_or(task.status);
                task.deadline = fields.deadline;
                task.updated_at = Utc::now();
                task.clone()
            }
            None => return Ok(None),
        };
        tables.replace_assignments(id, user_ids);
        Ok(Some(updated))
    }

    async fn set_task_status(&self, id: i32, status: bool) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tasks.get_mut(&id).map(|task| {
            task.status = status;
            task.updated_at = Utc::now();
            task.clone()
        }))
    }

    async fn delete_task(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.tasks.contains_key(&id) {
            return Ok(false);
        }
        tables.assignments.retain(|(task, _)| *task != id);
        tables.tasks.remove(&id);
        Ok(true)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.values().cloned().collect())
    }

    async fn list_tasks_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|task| tables.assignments.contains(&(task.id, user_id)))
            .cloned()
            .collect())
    }

    async fn assignees(&self, task_ids: &[i32]) -> Result<Vec<(i32, UserSummary)>, AppError> {
        let tables = self.tables.read().await;
        let wanted: BTreeSet<i32> = task_ids.iter().copied().collect();
        Ok(tables
            .assignments
            .iter()
            .filter(|(task_id, _)| wanted.contains(task_id))
            .filter_map(|(task_id, user_id)| {
                tables
                    .users
                    .get(user_id)
                    .map(|record| (*task_id, UserSummary::from(&record.user)))
            })
            .collect())
    }

    async fn insert_token(&self, token: &AccessToken) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&token.user_id) {
            return Err(AppError::PersistenceError(format!(
                "access_tokens references missing user {}",
                token.user_id
            )));
        }
        tables.tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn token_is_active(&self, id: Uuid, user_id: i32) -> Result<bool, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .get(&id)
            .map_or(false, |token| token.user_id == user_id))
    }

    async fn revoke_tokens(&self, user_id: i32) -> Result<u64, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.tokens.len();
        tables.tokens.retain(|_, token| token.user_id != user_id);
        Ok((before - tables.tokens.len()) as u64)
    }
}
