//! Application state shared across handlers.

use std::sync::Arc;

use foundry_core::ItemRepository;
use foundry_db::ImageStorageBackend;

use crate::services::ReportService;

/// Global rate limiter type (direct quota, no keyed bucketing).
pub type GlobalRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
///
/// Every collaborator is constructed at startup and injected here; no
/// module-level singletons.
#[derive(Clone)]
pub struct AppState {
    /// Item repository (listings, deletion, contact lookups).
    pub items: Arc<dyn ItemRepository>,
    /// Report pipeline service (validate → persist → enrich → notify).
    pub reports: ReportService,
    /// Image hosting backend for uploads.
    pub images: Arc<dyn ImageStorageBackend>,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}
