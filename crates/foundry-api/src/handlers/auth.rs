//! User profile handlers.
//!
//! Identity is owned by the external provider; the app trusts the
//! client-supplied UID/email. This endpoint mirrors the historical
//! contract and performs no durable persistence.

use axum::{extract::Json, http::StatusCode};
use chrono::Utc;
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub uid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Create a user profile record (mock).
///
/// # Returns
/// - 201 Created with `{ message, user }`
/// - 400 Bad Request when uid or email is missing
pub async fn create_user(
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let uid = req.uid.filter(|v| !v.trim().is_empty());
    let email = req.email.filter(|v| !v.trim().is_empty());

    let (uid, email) = match (uid, email) {
        (Some(uid), Some(email)) => (uid, email),
        _ => {
            return Err(ApiError::BadRequest(
                "Missing required fields: uid and email".to_string(),
            ))
        }
    };

    let name = req
        .name
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(&email).to_string());

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User created successfully (mock)",
            "user": {
                "uid": uid,
                "name": name,
                "email": email,
                "createdAt": Utc::now(),
            }
        })),
    ))
}
