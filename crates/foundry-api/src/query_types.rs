//! Query parameter types for the listing endpoints.

use serde::Deserialize;

use foundry_core::{DateRange, DiscoveryFilter, ReportKind, SortOrder, TypeFilter};

/// Query parameters accepted by `GET /api/items/discover`.
///
/// Everything is optional and lenient: unknown enum values fall back to
/// their defaults rather than rejecting the request, matching what the
/// filter bar actually sends.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscoverQuery {
    /// Free-text search across item type, description, and location.
    pub search: Option<String>,
    /// Category name or literal item type.
    pub item_type: Option<String>,
    /// Alias some clients send instead of `itemType`.
    pub category: Option<String>,
    /// Report kind: "lost", "found", or "all" (default).
    pub status: Option<String>,
    /// Named bucket: "today", "week", "month", "three-months".
    pub date_range: Option<String>,
    /// "newest" (default) or "oldest".
    pub sort_by: Option<String>,
}

impl DiscoverQuery {
    /// Convert the raw query into a discovery filter.
    pub fn into_filter(self) -> DiscoveryFilter {
        let type_param = self.item_type.or(self.category).unwrap_or_default();

        DiscoveryFilter {
            search: self.search.filter(|s| !s.trim().is_empty()),
            item_type: TypeFilter::parse(&type_param),
            report_kind: self.status.as_deref().and_then(ReportKind::parse),
            date_range: DateRange::parse(self.date_range.as_deref().unwrap_or_default()),
            sort_by: SortOrder::parse(self.sort_by.as_deref().unwrap_or_default()),
        }
    }
}
