//! # foundry-match
//!
//! Thin HTTP client for the external AI matching service.
//!
//! All matching and embedding intelligence lives out of process; this
//! crate only moves payloads across the boundary defined by
//! [`foundry_core::MatchingBackend`].

pub mod client;
pub mod mock;

pub use client::{MatchServiceClient, DEFAULT_MATCH_SERVICE_URL, MATCH_TIMEOUT_SECS};
pub use mock::{MockCall, MockMatchingBackend};
