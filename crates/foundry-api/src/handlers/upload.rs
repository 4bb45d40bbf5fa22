//! Image upload handlers.
//!
//! Uploads go through the image-hosting boundary: the handler only
//! enforces the size cap and hands the bytes to the configured backend,
//! which sniffs the format and rejects non-images.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};

use foundry_core::defaults;

use crate::error::ApiError;
use crate::state::AppState;

/// Store an uploaded image.
///
/// # Request
/// Multipart form with an `image` field and an optional `folder` field.
///
/// # Returns
/// - 200 OK with `{ success, data: { url, publicId, format, size } }`
/// - 400 Bad Request when the field is missing, oversized, or not an
///   image
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut folder = defaults::UPLOAD_FOLDER.to_string();
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable image field: {e}")))?;
                if data.len() > defaults::UPLOAD_MAX_BYTES {
                    return Err(ApiError::BadRequest(format!(
                        "Image exceeds the {} MB upload limit",
                        defaults::UPLOAD_MAX_BYTES / (1024 * 1024)
                    )));
                }
                image = Some(data.to_vec());
            }
            Some("folder") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable folder field: {e}")))?;
                if !value.trim().is_empty() {
                    folder = value.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("No image file provided".to_string()))?;
    let stored = state.images.store(&folder, &image).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "url": stored.url,
            "publicId": stored.public_id,
            "format": stored.format,
            "size": stored.size_bytes,
        }
    })))
}

/// Delete a stored image by public id.
pub async fn delete_image(
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.images.delete(&public_id).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Image deleted successfully",
    })))
}
