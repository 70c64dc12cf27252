//! Idempotent schema bootstrap, run once at startup.

use sqlx::PgPool;

use super::manager::DatabaseError;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL DEFAULT '',
    last_name TEXT NOT NULL DEFAULT '',
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS user_profiles (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    role TEXT NOT NULL DEFAULT 'viewer',
    last_login_time TIMESTAMPTZ,
    last_logout_time TIMESTAMPTZ
)
"#;

// Sensor values are text by contract; typing is deferred to consumers.
const CREATE_TREE_DATA: &str = r#"
CREATE TABLE IF NOT EXISTS tree_data (
    id BIGSERIAL PRIMARY KEY,
    "Timestamp_Raw" TEXT,
    "Timestamp" TEXT,
    "Temperature" TEXT,
    "Pressure" TEXT,
    "Humidity" TEXT,
    "Dendro" TEXT,
    "Sapflow" TEXT,
    "SF_maxD" TEXT,
    "SF_Signal" TEXT,
    "SF_Noise" TEXT,
    "Dendro_Dup" TEXT
)
"#;

/// Create the service tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for ddl in [CREATE_USERS, CREATE_PROFILES, CREATE_TREE_DATA] {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}
