use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::profiles::ProfileRepository;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::policy::{self, Action};

/// GET /api/profiles - List all profiles (any authenticated caller)
pub async fn list(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::ListProfiles).await?;

    let profiles = ProfileRepository::new(pool).list().await?;
    Ok(Json(json!(profiles)))
}

/// GET /api/profiles/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::GetProfile).await?;

    let profile = ProfileRepository::new(pool)
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(Json(json!(profile)))
}
