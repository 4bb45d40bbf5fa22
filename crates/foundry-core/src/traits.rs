//! Core traits for Foundry abstractions.
//!
//! These traits define the interfaces the concrete store, matching, and
//! notification implementations must satisfy. Collaborators are
//! constructed explicitly at process startup and injected into the
//! services that use them; nothing here is ambient global state.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    EnrichmentStatus, Item, ItemStatus, MatchCandidate, NewItem, ReportKind,
};

// =============================================================================
// ITEM REPOSITORY
// =============================================================================

/// Repository for item CRUD operations.
///
/// The store id is canonical for every lookup, update, and delete. The
/// matching service's external id is a correlation tag resolved only
/// through [`ItemRepository::fetch_by_external_id`].
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new item, assigning its store id and timestamps.
    async fn insert(&self, item: NewItem) -> Result<Item>;

    /// Fetch an item by store id.
    async fn fetch(&self, id: Uuid) -> Result<Item>;

    /// Fetch an item by the matching service's external id, if any item
    /// carries it.
    async fn fetch_by_external_id(&self, external_id: &str) -> Result<Option<Item>>;

    /// List every item, newest first.
    async fn list_all(&self) -> Result<Vec<Item>>;

    /// List items of one report kind, newest first.
    async fn list_by_kind(&self, kind: ReportKind) -> Result<Vec<Item>>;

    /// List items whose contact info equals `contact` (case-insensitive
    /// exact match), newest first.
    async fn list_by_contact(&self, contact: &str) -> Result<Vec<Item>>;

    /// Record the outcome of the enrichment step. The external id is
    /// assigned at most once; a second assignment attempt is ignored and
    /// only the status/timestamp are refreshed.
    async fn record_enrichment(
        &self,
        id: Uuid,
        external_id: Option<&str>,
        status: EnrichmentStatus,
    ) -> Result<()>;

    /// Replace the stored match candidates for a lost item.
    async fn update_matches(&self, id: Uuid, matches: &[MatchCandidate]) -> Result<()>;

    /// Update the lifecycle status.
    async fn set_status(&self, id: Uuid, status: ItemStatus) -> Result<()>;

    /// Delete by store id. Returns whether a row was removed; a miss is
    /// not an error.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Total number of stored items.
    async fn count(&self) -> Result<i64>;
}

// =============================================================================
// MATCHING BACKEND
// =============================================================================

/// Payload forwarded to the matching service's report endpoint.
#[derive(Debug, Clone)]
pub struct MatchReportRequest {
    /// Durable image URL, or empty when the report has no photo.
    pub image_url: String,
    pub description: String,
    pub location: String,
    /// The structured category when present, otherwise the free-text
    /// item type.
    pub category: String,
    pub report_kind: ReportKind,
}

/// A ranked candidate returned inline by the report endpoint (lost
/// reports only).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    /// External id of the counterpart item.
    pub external_id: String,
    pub score: f32,
    pub confidence: String,
    pub reason: String,
}

/// Response from the matching service's report endpoint.
#[derive(Debug, Clone)]
pub struct MatchReportResponse {
    /// Opaque identifier the service assigned to this report.
    pub external_id: String,
    /// Embedding handle for follow-up similarity queries, when provided.
    pub embedding: Option<Vec<f32>>,
    /// Ranked candidates; empty for found reports.
    pub matches: Vec<RankedCandidate>,
}

/// A candidate returned by a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarCandidate {
    pub external_id: String,
    pub score: f32,
}

/// Thin client boundary to the external AI matching service. This repo
/// implements no matching algorithm of its own; both operations are pure
/// pass-through.
#[async_trait]
pub trait MatchingBackend: Send + Sync {
    /// Submit a report for embedding and (lost-only) candidate ranking.
    /// Failures propagate; the report pipeline treats them as
    /// best-effort enrichment.
    async fn report(&self, req: MatchReportRequest) -> Result<MatchReportResponse>;

    /// Query ranked candidates for an embedding handle. Swallows errors
    /// and returns an empty list so a degraded matching service never
    /// fails a found-item submission.
    async fn find_similar(&self, embedding: &[f32], top_k: usize) -> Vec<SimilarCandidate>;
}

// =============================================================================
// MAILER
// =============================================================================

/// Match-notification delivery boundary.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send both match notifications (one to each party). Returns whether
    /// delivery succeeded; never raises. Failures are logged, not
    /// retried, not queued.
    async fn send_match_notification(&self, lost: &Item, found: &Item, score: f32) -> bool;
}
