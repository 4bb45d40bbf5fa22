//! HTTP client for the external AI matching service.
//!
//! The service is the sole source of semantic matching; this client is
//! purely a pass-through. Reports are submitted as a multipart form to
//! `/report`; similarity queries go to `/find-similar` as JSON.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use foundry_core::{
    defaults, Error, MatchReportRequest, MatchReportResponse, MatchingBackend, RankedCandidate,
    Result, SimilarCandidate,
};

/// Default matching service endpoint.
pub const DEFAULT_MATCH_SERVICE_URL: &str = defaults::MATCH_SERVICE_URL;

/// Timeout for matching service requests (seconds).
pub const MATCH_TIMEOUT_SECS: u64 = defaults::MATCH_TIMEOUT_SECS;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct ReportWireResponse {
    #[serde(default)]
    item_id: Option<String>,
    #[serde(default)]
    matches: Option<Vec<CandidateWire>>,
    #[serde(default)]
    embedding: Option<Vec<f32>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateWire {
    item_id: String,
    score: f32,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct FindSimilarWireRequest<'a> {
    embedding: &'a [f32],
    top_k: usize,
}

#[derive(Debug, Deserialize)]
struct FindSimilarWireResponse {
    #[serde(default)]
    matches: Vec<SimilarWire>,
}

#[derive(Debug, Deserialize)]
struct SimilarWire {
    item_id: String,
    score: f32,
}

// =============================================================================
// CLIENT
// =============================================================================

/// Matching service client.
pub struct MatchServiceClient {
    client: Client,
    base_url: String,
}

impl MatchServiceClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MATCH_SERVICE_URL.to_string())
    }

    /// Create a new client with a custom base URL.
    pub fn with_config(base_url: String) -> Self {
        let timeout = std::env::var("MATCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(MATCH_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            subsystem = "matching",
            component = "client",
            base_url = %base_url,
            timeout_secs = timeout,
            "Initializing matching service client"
        );

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from the `MATCH_SERVICE_URL` environment variable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("MATCH_SERVICE_URL")
            .unwrap_or_else(|_| DEFAULT_MATCH_SERVICE_URL.to_string());
        Self::with_config(base_url)
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for MatchServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MatchingBackend for MatchServiceClient {
    async fn report(&self, req: MatchReportRequest) -> Result<MatchReportResponse> {
        let start = Instant::now();
        let url = format!("{}/report", self.base_url);

        let form = Form::new()
            .text("image_url", req.image_url)
            .text("description", req.description)
            .text("location", req.location)
            .text("category", req.category)
            .text("report_type", req.report_kind.as_str());

        debug!(
            subsystem = "matching",
            component = "client",
            op = "report",
            report_kind = %req.report_kind,
            "Submitting report to matching service"
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Matching(e.to_string()))?;

        let body: ReportWireResponse = response.json().await?;

        if let Some(error) = body.error {
            return Err(Error::Matching(error));
        }
        let external_id = body
            .item_id
            .ok_or_else(|| Error::Matching("report response carried no item_id".to_string()))?;

        let matches = body
            .matches
            .unwrap_or_default()
            .into_iter()
            .map(|c| RankedCandidate {
                external_id: c.item_id,
                score: c.score,
                confidence: c
                    .confidence
                    .unwrap_or_else(|| foundry_core::confidence_label(c.score).to_string()),
                reason: c.reason.unwrap_or_default(),
            })
            .collect::<Vec<_>>();

        info!(
            subsystem = "matching",
            component = "client",
            op = "report",
            external_id = %external_id,
            result_count = matches.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Matching service accepted report"
        );

        Ok(MatchReportResponse {
            external_id,
            embedding: body.embedding,
            matches,
        })
    }

    async fn find_similar(&self, embedding: &[f32], top_k: usize) -> Vec<SimilarCandidate> {
        let url = format!("{}/find-similar", self.base_url);
        let payload = FindSimilarWireRequest { embedding, top_k };

        // Soft-fail: a degraded matching service must never fail the
        // found-item submission that triggered the query.
        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(
                    subsystem = "matching",
                    component = "client",
                    op = "find_similar",
                    error = %e,
                    "Similarity query failed"
                );
                return Vec::new();
            }
        };

        let body: FindSimilarWireResponse = match response.error_for_status() {
            Ok(r) => match r.json().await {
                Ok(b) => b,
                Err(e) => {
                    warn!(
                        subsystem = "matching",
                        component = "client",
                        op = "find_similar",
                        error = %e,
                        "Similarity response was not decodable"
                    );
                    return Vec::new();
                }
            },
            Err(e) => {
                warn!(
                    subsystem = "matching",
                    component = "client",
                    op = "find_similar",
                    error = %e,
                    "Similarity query returned an error status"
                );
                return Vec::new();
            }
        };

        body.matches
            .into_iter()
            .map(|m| SimilarCandidate {
                external_id: m.item_id,
                score: m.score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = MatchServiceClient::with_config("http://ai.local:8000/".to_string());
        assert_eq!(client.base_url(), "http://ai.local:8000");
    }

    #[test]
    fn test_report_response_decoding() {
        let body: ReportWireResponse = serde_json::from_str(
            r#"{
                "status": "success",
                "message": "Lost item reported successfully",
                "item_id": "LOST-KEY-A9F2",
                "matches": [
                    {"item_id": "FOUND-KEY-B1C3", "score": 0.91,
                     "confidence": "High",
                     "reason": "Image and description are semantically similar"}
                ],
                "embedding": [0.1, 0.2]
            }"#,
        )
        .unwrap();

        assert_eq!(body.item_id.as_deref(), Some("LOST-KEY-A9F2"));
        assert_eq!(body.matches.as_ref().unwrap().len(), 1);
        assert_eq!(body.embedding.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_found_report_response_without_matches() {
        let body: ReportWireResponse = serde_json::from_str(
            r#"{"status": "success", "item_id": "FOUND-WALLET-C2D4"}"#,
        )
        .unwrap();
        assert_eq!(body.item_id.as_deref(), Some("FOUND-WALLET-C2D4"));
        assert!(body.matches.is_none());
        assert!(body.error.is_none());
    }

    #[test]
    fn test_similar_response_decoding() {
        let body: FindSimilarWireResponse = serde_json::from_str(
            r#"{"matches": [{"item_id": "LOST-KEY-A9F2", "score": 0.83}]}"#,
        )
        .unwrap();
        assert_eq!(body.matches.len(), 1);
        assert_eq!(body.matches[0].item_id, "LOST-KEY-A9F2");
    }
}
