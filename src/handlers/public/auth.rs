use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{self, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::profiles::ProfileRepository;
use crate::database::users::{NewUser, UserRepository};
use crate::error::{ApiError, ApiResult};
use crate::policy::Role;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register - Create a user with its profile and return a token
pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let pool = DatabaseManager::pool().await?;
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
    } else if payload.password != payload.password_confirm {
        field_errors.insert("password".to_string(), "Passwords must match".to_string());
    }

    let role = payload.role.as_deref().unwrap_or("viewer");
    if Role::parse(role).is_none() {
        field_errors.insert(
            "role".to_string(),
            format!("'{}' is not a valid role", role),
        );
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Registration payload is invalid",
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

    let token = issue_token(&user.username, user.id, &profile.role)?;

    tracing::info!(username = %user.username, "registered new user");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": user,
            "profile": profile,
            "token": token,
            "message": "User registered successfully"
        })),
    ))
}

/// POST /auth/login - Verify credentials, stamp login time, return a token
///
/// A user that somehow has no profile yet gets a default one here; the
/// invariant is that every authenticated user ends up with exactly one.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Json<Value>> {
    let username = payload.username.trim();
    let password = payload.password.trim();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Missing username or password"));
    }

    let pool = DatabaseManager::pool().await?;

    let user = auth::authenticate(&pool, username, password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let profiles = ProfileRepository::new(pool);
    profiles.get_or_create(user.id).await?;
    let profile = profiles.touch_login(user.id).await?;

    let token = issue_token(&user.username, user.id, &profile.role)?;

    Ok(Json(json!({
        "user": user,
        "profile": profile,
        "token": token,
        "message": "Login successful"
    })))
}

fn issue_token(username: &str, user_id: uuid::Uuid, role: &str) -> Result<String, ApiError> {
    auth::generate_jwt(Claims::new(user_id, username.to_string(), role.to_string())).map_err(
        |e| {
            tracing::error!("JWT generation failed: {}", e);
            ApiError::internal_server_error("Authentication token could not be generated")
        },
    )
}
