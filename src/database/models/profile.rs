use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Role and login-activity metadata attached to a user, one row per user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub last_login_time: Option<DateTime<Utc>>,
    pub last_logout_time: Option<DateTime<Utc>>,
}
