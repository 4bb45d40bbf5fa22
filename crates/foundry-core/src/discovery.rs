//! Discovery filtering over stored items.
//!
//! The discover view filters and sorts the full item list in memory:
//! report-kind, category/item-type, free-text search, and a named date
//! bucket, all conjunctive, followed by a creation-time sort. The filter
//! is pure — `now` is injected so bucketing is deterministic under test.

use chrono::{DateTime, Duration, Local, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Item, ItemCategory, ReportKind};

// =============================================================================
// NAMED DATE BUCKETS
// =============================================================================

/// Named date ranges offered by the discover view.
///
/// Each bucket retains items created at or after a cutoff computed
/// relative to "now": the start of the current local day, 7 days back,
/// or 1/3 calendar months back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    /// No temporal restriction.
    #[default]
    Any,
    Today,
    Week,
    Month,
    ThreeMonths,
}

impl DateRange {
    /// Parse from the wire representation. Empty and "any" both mean no
    /// restriction; unknown values are treated the same way rather than
    /// rejected.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            "three-months" => Self::ThreeMonths,
            _ => Self::Any,
        }
    }

    /// Compute the inclusive cutoff timestamp for this bucket relative to
    /// `now`. Returns `None` for [`DateRange::Any`].
    ///
    /// "Today" starts at local midnight, not 24 hours ago.
    pub fn cutoff_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Any => None,
            Self::Today => {
                let local_day = now.with_timezone(&Local).date_naive();
                let midnight = local_day.and_time(NaiveTime::MIN);
                Some(
                    midnight
                        .and_local_timezone(Local)
                        .earliest()
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|| midnight.and_utc()),
                )
            }
            Self::Week => Some(now - Duration::days(7)),
            Self::Month => Some(
                now.checked_sub_months(Months::new(1))
                    .unwrap_or(now - Duration::days(30)),
            ),
            Self::ThreeMonths => Some(
                now.checked_sub_months(Months::new(3))
                    .unwrap_or(now - Duration::days(90)),
            ),
        }
    }
}

// =============================================================================
// SORT ORDER
// =============================================================================

/// Creation-time sort order for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently created first (default).
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "oldest" => Self::Oldest,
            _ => Self::Newest,
        }
    }
}

// =============================================================================
// TYPE FILTER
// =============================================================================

/// The `itemType` query parameter: either one of the structured
/// categories, or a literal item-type string for exact matching.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeFilter {
    Category(ItemCategory),
    ItemType(String),
}

impl TypeFilter {
    /// Parse the wire value. Known category names become category
    /// filters; anything else matches the free-text item type exactly
    /// (case-insensitive). Empty values mean no filter.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        match ItemCategory::parse(trimmed) {
            Some(category) => Some(Self::Category(category)),
            None => Some(Self::ItemType(trimmed.to_lowercase())),
        }
    }

    fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Category(category) => {
                // Legacy rows predate the structured category field; fall
                // back to keyword inference on the free-text type.
                item.category == Some(*category)
                    || (item.category.is_none()
                        && ItemCategory::infer(&item.item_type) == Some(*category))
            }
            Self::ItemType(needle) => item.item_type.to_lowercase() == *needle,
        }
    }
}

// =============================================================================
// DISCOVERY FILTER
// =============================================================================

/// Conjunctive filter + sort over the full item list.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryFilter {
    /// Case-insensitive substring search across item type, description,
    /// and location.
    pub search: Option<String>,
    /// Category or exact item-type restriction.
    pub item_type: Option<TypeFilter>,
    /// Report-kind restriction; `None` means "all".
    pub report_kind: Option<ReportKind>,
    /// Named creation-date bucket.
    pub date_range: DateRange,
    /// Creation-time sort order.
    pub sort_by: SortOrder,
}

impl DiscoveryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn for_kind(mut self, kind: ReportKind) -> Self {
        self.report_kind = Some(kind);
        self
    }

    pub fn in_category(mut self, category: ItemCategory) -> Self {
        self.item_type = Some(TypeFilter::Category(category));
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort_by = order;
        self
    }

    /// Check if the filter applies no restriction (sort still applies).
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.item_type.is_none()
            && self.report_kind.is_none()
            && self.date_range == DateRange::Any
    }

    /// Apply the filter and sort to `items`, evaluating date buckets
    /// relative to `now`. All restrictions are conjunctive; an empty
    /// result is not an error.
    pub fn apply(&self, items: &[Item], now: DateTime<Utc>) -> Vec<Item> {
        let cutoff = self.date_range.cutoff_from(now);
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut selected: Vec<Item> = items
            .iter()
            .filter(|item| {
                if let Some(kind) = self.report_kind {
                    if item.report_kind != kind {
                        return false;
                    }
                }
                if let Some(type_filter) = &self.item_type {
                    if !type_filter.matches(item) {
                        return false;
                    }
                }
                if let Some(needle) = &needle {
                    let hit = item.item_type.to_lowercase().contains(needle.as_str())
                        || item.description.to_lowercase().contains(needle.as_str())
                        || item.location.to_lowercase().contains(needle.as_str());
                    if !hit {
                        return false;
                    }
                }
                if let Some(cutoff) = cutoff {
                    if item.created_at < cutoff {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        match self.sort_by {
            SortOrder::Newest => selected.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => selected.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrichmentStatus, ItemStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn item(
        item_type: &str,
        description: &str,
        location: &str,
        kind: ReportKind,
        created_at: DateTime<Utc>,
    ) -> Item {
        Item {
            id: Uuid::new_v4(),
            external_id: None,
            item_type: item_type.to_string(),
            category: None,
            description: description.to_string(),
            location: location.to_string(),
            date_lost: (kind == ReportKind::Lost).then_some(created_at),
            date_found: (kind == ReportKind::Found).then_some(created_at),
            contact_info: "user@example.edu".to_string(),
            contact_number: None,
            reporter_name: None,
            image_url: None,
            report_kind: kind,
            status: ItemStatus::Active,
            enrichment: EnrichmentStatus::Pending,
            matches: vec![],
            created_at,
            updated_at: created_at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    fn fixture() -> Vec<Item> {
        let now = now();
        vec![
            item(
                "key",
                "small silver key",
                "Library",
                ReportKind::Found,
                now - Duration::hours(1),
            ),
            item(
                "wallet",
                "brown leather wallet",
                "Student Center",
                ReportKind::Lost,
                now - Duration::days(2),
            ),
            item(
                "iPhone 13",
                "black phone with clear case",
                "Gym",
                ReportKind::Lost,
                now - Duration::days(10),
            ),
            item(
                "Blue Backpack",
                "navy backpack with textbooks",
                "Cafeteria",
                ReportKind::Found,
                now - Duration::days(100),
            ),
        ]
    }

    #[test]
    fn test_empty_filter_returns_everything_newest_first() {
        let items = fixture();
        let result = DiscoveryFilter::new().apply(&items, now());
        assert_eq!(result.len(), items.len());
        for pair in result.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_kind_filter_is_exact() {
        let result = DiscoveryFilter::new()
            .for_kind(ReportKind::Lost)
            .apply(&fixture(), now());
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|i| i.report_kind == ReportKind::Lost));
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let result = DiscoveryFilter::new()
            .with_search("LIBRARY")
            .apply(&fixture(), now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_type, "key");
    }

    #[test]
    fn test_search_matches_description_substring() {
        let result = DiscoveryFilter::new()
            .with_search("leather")
            .apply(&fixture(), now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_type, "wallet");
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let result = DiscoveryFilter::new()
            .with_search("   ")
            .apply(&fixture(), now());
        assert_eq!(result.len(), fixture().len());
    }

    #[test]
    fn test_category_filter_uses_keyword_fallback() {
        // None of the fixture items carry a structured category; the
        // electronics bucket must still pick up the phone via inference.
        let result = DiscoveryFilter::new()
            .in_category(ItemCategory::Electronics)
            .apply(&fixture(), now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_type, "iPhone 13");
    }

    #[test]
    fn test_structured_category_wins_over_inference() {
        let mut items = fixture();
        items[2].category = Some(ItemCategory::Other);
        let result = DiscoveryFilter::new()
            .in_category(ItemCategory::Electronics)
            .apply(&items, now());
        assert!(result.is_empty());
    }

    #[test]
    fn test_literal_item_type_filter() {
        let filter = DiscoveryFilter {
            item_type: TypeFilter::parse("Wallet"),
            ..Default::default()
        };
        // "wallet" parses as a category; a non-category string matches the
        // free-text type exactly.
        let filter_phone = DiscoveryFilter {
            item_type: TypeFilter::parse("iphone 13"),
            ..Default::default()
        };
        assert_eq!(filter.apply(&fixture(), now()).len(), 1);
        let result = filter_phone.apply(&fixture(), now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_type, "iPhone 13");
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let result = DiscoveryFilter::new()
            .for_kind(ReportKind::Lost)
            .with_search("key")
            .apply(&fixture(), now());
        assert!(result.is_empty());
    }

    #[test]
    fn test_week_bucket_excludes_older_items() {
        let result = DiscoveryFilter::new()
            .within(DateRange::Week)
            .apply(&fixture(), now());
        assert_eq!(result.len(), 2);
        assert!(result
            .iter()
            .all(|i| i.created_at >= now() - Duration::days(7)));
    }

    #[test]
    fn test_today_bucket_excludes_items_before_local_midnight() {
        let result = DiscoveryFilter::new()
            .within(DateRange::Today)
            .apply(&fixture(), now());
        // Only the one-hour-old key can fall after local midnight; the
        // 2-day-old wallet never can, regardless of local offset.
        assert!(result.iter().all(|i| i.item_type == "key"));
        assert!(!result
            .iter()
            .any(|i| i.created_at <= now() - Duration::days(2)));
    }

    #[test]
    fn test_month_bucket_uses_calendar_months() {
        let result = DiscoveryFilter::new()
            .within(DateRange::Month)
            .apply(&fixture(), now());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_three_month_bucket() {
        let result = DiscoveryFilter::new()
            .within(DateRange::ThreeMonths)
            .apply(&fixture(), now());
        // The 100-day-old backpack is out; 2026-03-15 minus 3 months is
        // 2025-12-15, and the backpack was created 2025-12-05.
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_oldest_sort_reverses_order() {
        let result = DiscoveryFilter::new()
            .sorted(SortOrder::Oldest)
            .apply(&fixture(), now());
        for pair in result.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[test]
    fn test_date_range_parse() {
        assert_eq!(DateRange::parse("today"), DateRange::Today);
        assert_eq!(DateRange::parse("three-months"), DateRange::ThreeMonths);
        assert_eq!(DateRange::parse(""), DateRange::Any);
        assert_eq!(DateRange::parse("fortnight"), DateRange::Any);
    }

    #[test]
    fn test_sort_order_parse_defaults_to_newest() {
        assert_eq!(SortOrder::parse("oldest"), SortOrder::Oldest);
        assert_eq!(SortOrder::parse("newest"), SortOrder::Newest);
        assert_eq!(SortOrder::parse(""), SortOrder::Newest);
    }

    #[test]
    fn test_is_empty() {
        assert!(DiscoveryFilter::new().is_empty());
        assert!(!DiscoveryFilter::new().for_kind(ReportKind::Lost).is_empty());
    }
}
