use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::user::UserSummary;

/// Represents a task entity as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    /// At most 255 characters.
    pub title: String,
    pub description: String,
    /// `true` while the task is open, `false` once it has been completed.
    pub status: bool,
    pub deadline: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A task with its assignees. Join-table columns never appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithUsers {
    #[serde(flatten)]
    pub task: Task,
    pub users: Vec<UserSummary>,
}

impl TaskWithUsers {
    pub fn user_ids(&self) -> Vec<i32> {
        self.users.iter().map(|user| user.id).collect()
    }
}

/// Payload shared by `POST /tasks/store` and `PUT /tasks/update/{task}`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    /// Only honoured on update; new tasks always start open.
    #[serde(default)]
    pub status: Option<bool>,

    #[validate(custom = "validate_deadline")]
    pub deadline: NaiveDate,

    /// Every assignee of the task. Existence is checked against the store separately.
    #[validate(length(min = 1, message = "At least one user must be assigned"))]
    pub users_id: Vec<i32>,
}

/// The scalar columns of a task write.
#[derive(Debug, Clone)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub status: Option<bool>,
    pub deadline: NaiveDate,
}

impl TaskInput {
    /// Splits the payload into scalar fields and the de-duplicated assignee ids,
    /// keeping the order in which ids were first submitted.
    pub fn into_parts(self) -> (TaskFields, Vec<i32>) {
        let mut user_ids: Vec<i32> = Vec::with_capacity(self.users_id.len());
        for id in self.users_id {
            if !user_ids.contains(&id) {
                user_ids.push(id);
            }
        }

        let fields = TaskFields {
            title: self.title,
            description: self.description,
            status: self.status,
            deadline: self.deadline,
        };
        (fields, user_ids)
    }
}

/// Deadlines must fall strictly after today's (UTC) date.
pub fn validate_deadline(deadline: &NaiveDate) -> Result<(), ValidationError> {
    if *deadline > Utc::now().date_naive() {
        return Ok(());
    }
    let mut error = ValidationError::new("after_today");
    error.message = Some(Cow::from("The deadline must be a date after today"));
    Err(error)
}
