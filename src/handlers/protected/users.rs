use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::auth;
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::profiles::ProfileRepository;
use crate::database::users::{NewUser, UserRepository, UserUpdate};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::policy::{self, Action, Role};

/// GET /api/users - List all users (any authenticated caller)
pub async fn list(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::ListUsers).await?;

    let users = UserRepository::new(pool).list().await?;
    Ok(Json(json!(users)))
}

/// GET /api/users/:id
pub async fn get(
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::GetUser).await?;

    let user = UserRepository::new(pool).get_404(id).await?;
    Ok(Json(json!(user)))
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<String>,
}

/// POST /api/users - Create a user (admin only)
pub async fn create(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::CreateUser).await?;

    let users = UserRepository::new(pool.clone());
    let mut field_errors = HashMap::new();

    let username = payload.username.trim().to_string();
    if username.is_empty() {
        field_errors.insert("username".to_string(), "This field is required".to_string());
    } else if users.username_taken(&username).await? {
        field_errors.insert("username".to_string(), "Username already exists".to_string());
    }

    let email = payload.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        field_errors.insert("email".to_string(), "Enter a valid email address".to_string());
    } else if users.email_taken(&email).await? {
        field_errors.insert("email".to_string(), "Email already exists".to_string());
    }

    let min_len = config::config().security.min_password_length;
    if payload.password.len() < min_len {
        field_errors.insert(
            "password".to_string(),
            format!("Password must be at least {} characters", min_len),
        );
    }

    let role = payload.role.as_deref().unwrap_or("viewer");
    if Role::parse(role).is_none() {
        field_errors.insert("role".to_string(), format!("'{}' is not a valid role", role));
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "User payload is invalid",
            Some(field_errors),
        ));
    }

    let user = users
        .create(NewUser {
            username,
            email,
            first_name: payload.first_name.trim().to_string(),
            last_name: payload.last_name.trim().to_string(),
            password_hash: auth::hash_password(&payload.password),
        })
        .await?;

    let profile = ProfileRepository::new(pool).create(user.id, role).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user, "profile": profile })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

/// PATCH /api/users/:id - Update user fields (admin only)
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::UpdateUser).await?;

    if let Some(email) = payload.email.as_deref() {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(ApiError::validation_error(
                "Enter a valid email address",
                None,
            ));
        }
    }

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            let min_len = config::config().security.min_password_length;
            if password.len() < min_len {
                return Err(ApiError::validation_error(
                    format!("Password must be at least {} characters", min_len),
                    None,
                ));
            }
            Some(auth::hash_password(password))
        }
        None => None,
    };

    let user = UserRepository::new(pool)
        .update(
            id,
            UserUpdate {
                email: payload.email.map(|e| e.trim().to_string()),
                first_name: payload.first_name,
                last_name: payload.last_name,
                password_hash,
            },
        )
        .await?;

    Ok(Json(json!(user)))
}

/// DELETE /api/users/:id - Remove a user and its profile (admin only)
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<Value>> {
    let pool = DatabaseManager::pool().await?;
    policy::authorize(&pool, auth_user.user_id, Action::DeleteUser).await?;

    UserRepository::new(pool).delete(id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
