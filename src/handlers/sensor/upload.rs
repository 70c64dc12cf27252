use axum::{extract::Multipart, response::Json};
use serde_json::{json, Value};

use crate::auth;
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::sensor::SensorStore;
use crate::error::{ApiError, ApiResult};
use crate::ingest;

/// POST /upload - Ingest a sensor CSV file
///
/// This endpoint reauthenticates on every request from `name` and `password`
/// form fields; it does not accept bearer tokens. The whole file is one
/// batch: it is appended completely or not at all. There is no idempotency
/// key, so re-uploading the same file appends the rows again.
pub async fn post(mut multipart: Multipart) -> ApiResult<Json<Value>> {
    let mut username: Option<String> = None;
    let mut password: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("Invalid 'name' field"))?;
                username = Some(value.trim().to_string());
            }
            Some("password") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("Invalid 'password' field"))?;
                password = Some(value.trim().to_string());
            }
            Some("file") => {
                file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::bad_request("Failed to read uploaded file"))?;
                file_bytes = Some(bytes.to_vec());
            }
            _ => {}
        }
    }

    let username = username.filter(|u| !u.is_empty());
    let password = password.filter(|p| !p.is_empty());
    let (username, password) = match (username, password) {
        (Some(u), Some(p)) => (u, p),
        _ => return Err(ApiError::bad_request("Missing username or password")),
    };

    let pool = DatabaseManager::pool().await?;

    auth::authenticate(&pool, &username, &password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User not authenticated"))?;

    let file_bytes = file_bytes.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    match &file_name {
        Some(name) if name.to_lowercase().ends_with(".csv") => {}
        _ => return Err(ApiError::bad_request("File is not CSV type")),
    }

    let skip_rows = config::config().ingest.skip_rows;
    let batch = ingest::run(&file_bytes, skip_rows)?;

    let appended = SensorStore::new(pool)
        .append_batch(&batch)
        .await
        .map_err(|e| {
            tracing::error!("Database write failed: {}", e);
            ApiError::internal_server_error("Database write failed")
        })?;

    tracing::info!(rows = appended, uploaded_by = %username, "sensor batch appended");

    Ok(Json(json!({
        "message": "CSV uploaded successfully",
        "rows_appended": appended
    })))
}
