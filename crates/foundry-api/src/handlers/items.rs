//! Item HTTP handlers: report submission, listings, discovery, deletion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use foundry_core::{EnrichmentStatus, Item, ReportKind, ReportPayload};

use crate::error::ApiError;
use crate::query_types::DiscoverQuery;
use crate::state::AppState;

fn listing(items: Vec<Item>) -> Json<serde_json::Value> {
    let total = items.len();
    Json(serde_json::json!({
        "items": items,
        "total": total,
    }))
}

fn created_message(kind: ReportKind, item: &Item) -> String {
    let base = match kind {
        ReportKind::Lost => "Lost item created successfully",
        ReportKind::Found => "Found item reported successfully",
    };
    // The frontend surfaces this suffix when the matching service was
    // unreachable during the request.
    if item.enrichment == EnrichmentStatus::Complete {
        base.to_string()
    } else {
        format!("{base} (AI processing pending)")
    }
}

/// Submit a lost-item report.
///
/// # Returns
/// - 201 Created with `{ message, item }`
/// - 400 Bad Request when required fields are missing
/// - 500 Internal Server Error when persistence fails
pub async fn create_lost_item(
    State(state): State<AppState>,
    Json(payload): Json<ReportPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let item = state
        .reports
        .submit_report(ReportKind::Lost, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": created_message(ReportKind::Lost, &item),
            "item": item,
        })),
    ))
}

/// Submit a found-item report.
///
/// # Returns
/// - 201 Created with `{ message, item }`
/// - 400 Bad Request when required fields are missing
/// - 500 Internal Server Error when persistence fails
pub async fn create_found_item(
    State(state): State<AppState>,
    Json(payload): Json<ReportPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let item = state
        .reports
        .submit_report(ReportKind::Found, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": created_message(ReportKind::Found, &item),
            "item": item,
        })),
    ))
}

/// Filtered/sorted listing across all items.
///
/// Filtering happens in memory over the full list; every restriction is
/// conjunctive and an empty result is a normal response.
pub async fn discover_items(
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.items.list_all().await?;
    let filtered = query.into_filter().apply(&items, Utc::now());
    Ok(listing(filtered))
}

/// Unfiltered listing of lost items.
pub async fn list_lost_items(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.items.list_by_kind(ReportKind::Lost).await?;
    Ok(listing(items))
}

/// Unfiltered listing of found items.
pub async fn list_found_items(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.items.list_by_kind(ReportKind::Found).await?;
    Ok(listing(items))
}

/// Listing by contact email ("my reports").
pub async fn list_user_items(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let items = state.items.list_by_contact(&email).await?;
    Ok(listing(items))
}

/// Delete an item by store id.
///
/// # Returns
/// - 200 OK with `{ message }` when a row was removed
/// - 404 Not Found when the id is unknown
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let removed = state.items.delete(id).await?;
    if !removed {
        return Err(ApiError::NotFound(format!("Item not found: {id}")));
    }

    Ok(Json(serde_json::json!({
        "message": "Item deleted successfully",
    })))
}
