//! # foundry-core
//!
//! Core types, traits, and abstractions for the Foundry lost-and-found
//! service.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other Foundry crates depend on.

pub mod dates;
pub mod defaults;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use discovery::{DateRange, DiscoveryFilter, SortOrder, TypeFilter};
pub use error::{Error, Result};
pub use models::{
    confidence_label, new_v7, EnrichmentStatus, Item, ItemCategory, ItemStatus, MatchCandidate,
    NewItem, ReportKind, ReportPayload,
};
pub use traits::{
    ItemRepository, Mailer, MatchReportRequest, MatchReportResponse, MatchingBackend,
    RankedCandidate, SimilarCandidate,
};
