//! Domain models for lost-and-found reports.
//!
//! Wire naming (camelCase, `itemId`, `reportType`) mirrors the frontend
//! contract and must not drift: the persisted record's JSON shape is what
//! the listing and profile pages consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;
use crate::defaults;
use crate::error::{Error, Result};

/// Mint a new time-ordered UUIDv7 store identifier.
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Whether a report concerns a lost or a found item. Immutable after
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }

    /// Parse from the wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lost" => Some(Self::Lost),
            "found" => Some(Self::Found),
            _ => None,
        }
    }

    /// The wire name of the date field this kind requires.
    pub fn date_field(&self) -> &'static str {
        match self {
            Self::Lost => "dateLost",
            Self::Found => "dateFound",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an item record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Active,
    Resolved,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }
}

/// Outcome of the best-effort enrichment step (matching-service round
/// trip). `Pending` means the step has not completed within the request;
/// `Failed` means it ran and the item was persisted without enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    Complete,
    Failed,
}

impl EnrichmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "complete" => Some(Self::Complete),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Structured item category. The enumerated set matches the category
/// selector the frontend renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Electronics,
    Clothing,
    Accessories,
    Books,
    Documents,
    Keys,
    Wallet,
    Other,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Accessories => "accessories",
            Self::Books => "books",
            Self::Documents => "documents",
            Self::Keys => "keys",
            Self::Wallet => "wallet",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "electronics" => Some(Self::Electronics),
            "clothing" => Some(Self::Clothing),
            "accessories" => Some(Self::Accessories),
            "books" => Some(Self::Books),
            "documents" => Some(Self::Documents),
            "keys" => Some(Self::Keys),
            "wallet" => Some(Self::Wallet),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Best-effort keyword bucketing for legacy rows whose reporters only
    /// filled in the free-text item type. A filtering aid, not a contract:
    /// unknown item types simply stay uncategorized.
    pub fn infer(item_type: &str) -> Option<Self> {
        let lowered = item_type.to_lowercase();
        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            let category = match word {
                "phone" | "iphone" | "laptop" | "macbook" | "tablet" | "ipad" | "charger"
                | "earbuds" | "airpods" | "headphones" | "camera" | "calculator" => {
                    Self::Electronics
                }
                "jacket" | "hoodie" | "coat" | "sweater" | "scarf" | "hat" | "gloves"
                | "shoes" => Self::Clothing,
                "watch" | "ring" | "necklace" | "bracelet" | "glasses" | "sunglasses"
                | "umbrella" => Self::Accessories,
                "book" | "textbook" | "notebook" | "novel" => Self::Books,
                "id" | "card" | "passport" | "license" | "document" | "documents" => {
                    Self::Documents
                }
                "key" | "keys" | "keychain" => Self::Keys,
                "wallet" | "purse" | "pouch" => Self::Wallet,
                _ => continue,
            };
            return Some(category);
        }
        None
    }
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MATCH CANDIDATES
// =============================================================================

/// Human-readable confidence band for a similarity score.
pub fn confidence_label(score: f32) -> &'static str {
    if score >= defaults::CONFIDENCE_HIGH {
        "High"
    } else if score >= defaults::CONFIDENCE_MEDIUM {
        "Medium"
    } else {
        "Low"
    }
}

/// A candidate match attached to a lost item, hydrated from the store by
/// the matching service's external id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub item_type: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "reportType")]
    pub report_kind: ReportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub score: f32,
    pub confidence: String,
    pub reason: String,
}

// =============================================================================
// ITEM
// =============================================================================

/// The sole persisted entity: a lost or found item report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Store-assigned UUIDv7; canonical identifier for every lookup,
    /// update, and delete.
    pub id: Uuid,
    /// Opaque identifier minted by the matching service (e.g.
    /// `LOST-WALLET-A9F2`); correlation tag only, set at most once.
    #[serde(rename = "itemId", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub item_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ItemCategory>,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_lost: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_found: Option<DateTime<Utc>>,
    pub contact_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "reportType")]
    pub report_kind: ReportKind,
    pub status: ItemStatus,
    pub enrichment: EnrichmentStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchCandidate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// The kind-appropriate report date (dateLost for lost items,
    /// dateFound for found ones).
    pub fn report_date(&self) -> Option<DateTime<Utc>> {
        match self.report_kind {
            ReportKind::Lost => self.date_lost,
            ReportKind::Found => self.date_found,
        }
    }

    /// Build a match-candidate summary of this item with the given score.
    pub fn to_match_candidate(&self, score: f32, reason: impl Into<String>) -> MatchCandidate {
        MatchCandidate {
            item_type: self.item_type.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            report_kind: self.report_kind,
            image_url: self.image_url.clone(),
            score,
            confidence: confidence_label(score).to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// REPORT PAYLOADS
// =============================================================================

/// Raw report submission as received on the wire. Everything is optional
/// here; `into_new_item` is the validation boundary that turns it into a
/// well-formed [`NewItem`] or rejects it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportPayload {
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "dates::deserialize_opt")]
    pub date_lost: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "dates::deserialize_opt")]
    pub date_found: Option<DateTime<Utc>>,
    pub contact_info: Option<String>,
    pub contact_number: Option<String>,
    pub reporter_name: Option<String>,
    pub image_url: Option<String>,
}

/// A validated report, ready for persistence.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub report_kind: ReportKind,
    pub item_type: String,
    pub category: Option<ItemCategory>,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub contact_info: String,
    pub contact_number: Option<String>,
    pub reporter_name: Option<String>,
    pub image_url: Option<String>,
}

fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(field);
            String::new()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ReportPayload {
    /// Validate the payload against the report kind. Collects every
    /// missing required field so the caller sees them all at once.
    pub fn into_new_item(self, kind: ReportKind) -> Result<NewItem> {
        let mut missing = Vec::new();

        let item_type = required(self.item_type, "itemType", &mut missing);
        let description = required(self.description, "description", &mut missing);
        let location = required(self.location, "location", &mut missing);

        let date = match kind {
            ReportKind::Lost => self.date_lost,
            ReportKind::Found => self.date_found,
        };
        if date.is_none() {
            missing.push(kind.date_field());
        }

        if !missing.is_empty() {
            return Err(Error::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        Ok(NewItem {
            report_kind: kind,
            category: self.category.as_deref().and_then(ItemCategory::parse),
            item_type,
            description,
            location,
            date: date.expect("checked above"),
            contact_info: non_empty(self.contact_info).unwrap_or_default(),
            contact_number: non_empty(self.contact_number),
            reporter_name: non_empty(self.reporter_name),
            image_url: non_empty(self.image_url),
        })
    }
}
