//! HTTP error mapping.
//!
//! Every failure surfaces as `{ "error": message }` with the appropriate
//! status: validation → 400, missing resources → 404, everything else →
//! 500.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// API-facing error type for handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(foundry_core::Error),
}

impl From<foundry_core::Error> for ApiError {
    fn from(err: foundry_core::Error) -> Self {
        match err {
            foundry_core::Error::Validation(msg) => ApiError::BadRequest(msg),
            foundry_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            foundry_core::Error::ItemNotFound(id) => {
                ApiError::NotFound(format!("Item not found: {id}"))
            }
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
                tracing::error!(subsystem = "api", error = %err, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError =
            foundry_core::Error::Validation("Missing required fields: itemType".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_item_not_found_maps_to_not_found() {
        let err: ApiError = foundry_core::Error::ItemNotFound(uuid::Uuid::nil()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_storage_maps_to_internal() {
        let err: ApiError = foundry_core::Error::Storage("disk full".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
