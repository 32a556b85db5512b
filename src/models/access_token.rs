use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// An issued bearer token. The row's `id` is the token's `jti` claim;
/// deleting the row revokes the token.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AccessToken {
    pub id: Uuid,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn issue(user_id: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
        }
    }
}
