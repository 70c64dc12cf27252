use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::profiles::ProfileRepository;
use crate::database::users::UserRepository;
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::policy::{self, Action, Role};

/// POST /api/auth/logout - Stamp the logout time
pub async fn logout(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    ProfileRepository::new(pool)
        .touch_logout(auth_user.user_id)
        .await?;

    Ok(Json(json!({ "message": "Logout successful" })))
}

/// GET /api/profile/me - Current user with their profile
pub async fn me(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;

    let user = UserRepository::new(pool.clone())
        .get_404(auth_user.user_id)
        .await?;
    let profile = ProfileRepository::new(pool)
        .find_by_user(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profile not found"))?;

    Ok(Json(json!({ "user": user, "profile": profile })))
}

/// PATCH /api/profile/role/:user_id - Reassign a user's role (admin only)
///
/// The payload is taken as raw JSON so the gate runs before any payload
/// validation: a viewer is denied no matter what they send.
pub async fn update_role(
    Path(user_id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;

    policy::authorize(&pool, auth_user.user_id, Action::UpdateRole).await?;

    let requested = payload
        .get("role")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::validation_error("Missing 'role' field", None))?;

    let role = Role::parse(requested).ok_or_else(|| {
        ApiError::validation_error(format!("'{}' is not a valid role", requested), None)
    })?;

    let user = UserRepository::new(pool.clone()).get_404(user_id).await?;
    let profile = ProfileRepository::new(pool)
        .set_role(user_id, role.as_str())
        .await?;

    tracing::info!(
        target_user = %user.username,
        new_role = role.as_str(),
        changed_by = %auth_user.username,
        "role updated"
    );

    Ok(Json(json!({
        "user": user,
        "profile": profile,
        "message": "Role updated successfully"
    })))
}
