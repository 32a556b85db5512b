use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::Store;
use crate::error::AppError;
use crate::models::{AccessToken, NewUser, Task, TaskFields, User, UserRecord, UserSummary};

const USER_COLUMNS: &str = "id, name, email, is_admin, created_at, updated_at";
const TASK_COLUMNS: &str = "id, title, description, status, deadline, created_at, updated_at";

/// `Store` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::PersistenceError(format!("Migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }
}

async fn insert_assignments(
    tx: &mut Transaction<'_, Postgres>,
    task_id: i32,
    user_ids: &[i32],
) -> Result<(), sqlx::Error> {
    for &user_id in user_ids {
        sqlx::query("INSERT INTO user_task (user_id, task_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(task_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (name, email, password, is_admin) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db) = &e {
                    if db.is_unique_violation() {
                        return AppError::ValidationError("The email has already been taken".into());
                    }
                }
                e.into()
            })
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let sql = format!("SELECT {}, password FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, UserRecord>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?,
        )
    }

    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_user_summaries(&self) -> Result<Vec<UserSummary>, AppError> {
        Ok(
            sqlx::query_as::<_, UserSummary>("SELECT id, name FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn existing_user_ids(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        Ok(
            sqlx::query_scalar::<_, i32>("SELECT id FROM users WHERE id = ANY($1) ORDER BY id")
                .bind(ids.to_vec())
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn delete_user(&self, id: i32) -> Result<bool, AppError> {
        // user_task and access_tokens cascade on the users foreign key.
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_task(&self, fields: &TaskFields, user_ids: &[i32]) -> Result<Task, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO tasks (title, description, deadline) VALUES ($1, $2, $3) RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(fields.deadline)
            .fetch_one(&mut *tx)
            .await?;

        insert_assignments(&mut tx, task.id, user_ids).await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        id: i32,
        fields: &TaskFields,
        user_ids: &[i32],
    ) -> Result<Option<Task>, AppError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE tasks \
             SET title = $1, description = $2, status = COALESCE($3, status), deadline = $4, updated_at = NOW() \
             WHERE id = $5 \
             RETURNING {}",
            TASK_COLUMNS
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(&fields.title)
            .bind(&fields.description)
            .bind(fields.status)
            .bind(fields.deadline)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(task) = task else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM user_task WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_assignments(&mut tx, id, user_ids).await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    async fn set_task_status(&self, id: i32, status: bool) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_task(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM tasks WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM user_task WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks ORDER BY id", TASK_COLUMNS);
        Ok(sqlx::query_as::<_, Task>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_tasks_for_user(&self, user_id: i32) -> Result<Vec<Task>, AppError> {
        let sql = "SELECT t.id, t.title, t.description, t.status, t.deadline, t.created_at, t.updated_at \
                   FROM tasks t \
                   JOIN user_task ut ON ut.task_id = t.id \
                   WHERE ut.user_id = $1 \
                   ORDER BY t.id";
        Ok(sqlx::query_as::<_, Task>(sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn assignees(&self, task_ids: &[i32]) -> Result<Vec<(i32, UserSummary)>, AppError> {
        let rows = sqlx::query_as::<_, (i32, i32, String)>(
            "SELECT ut.task_id, u.id, u.name \
             FROM user_task ut \
             JOIN users u ON u.id = ut.user_id \
             WHERE ut.task_id = ANY($1) \
             ORDER BY ut.task_id, u.id",
        )
        .bind(task_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(task_id, id, name)| (task_id, UserSummary { id, name }))
            .collect())
    }

    async fn insert_token(&self, token: &AccessToken) -> Result<(), AppError> {
        sqlx::query("INSERT INTO access_tokens (id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(token.id)
            .bind(token.user_id)
            .bind(token.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn token_is_active(&self, id: Uuid, user_id: i32) -> Result<bool, AppError> {
        Ok(sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM access_tokens WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn revoke_tokens(&self, user_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
