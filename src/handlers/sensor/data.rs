use axum::{
    extract::{Extension, Query},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::sensor::SensorStore;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::policy::{self, Action};

#[derive(Debug, Deserialize)]
pub struct DataQuery {
    /// Kept as a raw string: a non-numeric limit falls back to the default
    /// instead of rejecting the request.
    pub limit: Option<String>,
}

/// Resolve the row limit: anything missing, unparsable, or outside
/// `[1, max]` falls back to the default.
fn resolve_limit(raw: Option<&str>, default: i64, max: i64) -> i64 {
    match raw.map(str::trim).map(str::parse::<i64>) {
        Some(Ok(n)) if (1..=max).contains(&n) => n,
        _ => default,
    }
}

/// GET /api/treedata - Sensor rows as a JSON array
///
/// Selects the canonical columns by name; the table's synthetic key never
/// reaches the response.
pub async fn get(
    Query(query): Query<DataQuery>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::ReadSensorData).await?;

    let api_config = &config::config().api;
    let limit = resolve_limit(
        query.limit.as_deref(),
        api_config.default_row_limit,
        api_config.max_row_limit,
    );

    let rows = SensorStore::new(pool).fetch(limit).await?;
    Ok(Json(json!(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: i64 = 500;
    const MAX: i64 = 10_000;

    #[test]
    fn missing_limit_uses_default() {
        assert_eq!(resolve_limit(None, DEFAULT, MAX), DEFAULT);
    }

    #[test]
    fn valid_limit_is_respected() {
        assert_eq!(resolve_limit(Some("10"), DEFAULT, MAX), 10);
        assert_eq!(resolve_limit(Some("1"), DEFAULT, MAX), 1);
        assert_eq!(resolve_limit(Some("10000"), DEFAULT, MAX), 10_000);
    }

    #[test]
    fn out_of_range_falls_back_to_default() {
        assert_eq!(resolve_limit(Some("0"), DEFAULT, MAX), DEFAULT);
        assert_eq!(resolve_limit(Some("-5"), DEFAULT, MAX), DEFAULT);
        assert_eq!(resolve_limit(Some("999999"), DEFAULT, MAX), DEFAULT);
    }

    #[test]
    fn non_numeric_falls_back_to_default() {
        assert_eq!(resolve_limit(Some("abc"), DEFAULT, MAX), DEFAULT);
        assert_eq!(resolve_limit(Some(""), DEFAULT, MAX), DEFAULT);
        assert_eq!(resolve_limit(Some("12.5"), DEFAULT, MAX), DEFAULT);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert_eq!(resolve_limit(Some(" 25 "), DEFAULT, MAX), 25);
    }
}
