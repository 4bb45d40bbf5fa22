//! Mock matching backend for deterministic testing.
//!
//! Provides canned report/similarity responses, optional failure modes,
//! and a call log so tests can assert exactly what the pipeline sent.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use foundry_core::{
    Error, MatchReportRequest, MatchReportResponse, MatchingBackend, RankedCandidate, Result,
    SimilarCandidate,
};

/// A recorded call against the mock backend.
#[derive(Debug, Clone)]
pub enum MockCall {
    Report {
        description: String,
        category: String,
        report_kind: String,
    },
    FindSimilar {
        top_k: usize,
    },
}

#[derive(Debug, Clone)]
struct MockConfig {
    external_id: String,
    embedding: Option<Vec<f32>>,
    matches: Vec<RankedCandidate>,
    similar: Vec<SimilarCandidate>,
    fail_reports: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            external_id: "MOCK-ITEM-0001".to_string(),
            embedding: Some(vec![0.1, 0.2, 0.3]),
            matches: Vec::new(),
            similar: Vec::new(),
            fail_reports: false,
        }
    }
}

/// Mock matching backend.
#[derive(Clone, Default)]
pub struct MockMatchingBackend {
    config: Arc<Mutex<MockConfig>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockMatchingBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the external id returned for reports.
    pub fn with_external_id(self, external_id: impl Into<String>) -> Self {
        self.config.lock().unwrap().external_id = external_id.into();
        self
    }

    /// Set the embedding handle returned for reports (None disables it).
    pub fn with_embedding(self, embedding: Option<Vec<f32>>) -> Self {
        self.config.lock().unwrap().embedding = embedding;
        self
    }

    /// Set the ranked candidates returned for lost reports.
    pub fn with_matches(self, matches: Vec<RankedCandidate>) -> Self {
        self.config.lock().unwrap().matches = matches;
        self
    }

    /// Set the candidates returned by similarity queries.
    pub fn with_similar(self, similar: Vec<SimilarCandidate>) -> Self {
        self.config.lock().unwrap().similar = similar;
        self
    }

    /// Make every report call fail (similarity queries still soft-fail
    /// to empty, mirroring the real client).
    pub fn failing(self) -> Self {
        self.config.lock().unwrap().fail_reports = true;
        self
    }

    /// All calls recorded so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of report calls recorded.
    pub fn report_calls(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Report { .. }))
            .count()
    }

    /// Number of similarity calls recorded.
    pub fn similar_calls(&self) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::FindSimilar { .. }))
            .count()
    }
}

#[async_trait]
impl MatchingBackend for MockMatchingBackend {
    async fn report(&self, req: MatchReportRequest) -> Result<MatchReportResponse> {
        self.call_log.lock().unwrap().push(MockCall::Report {
            description: req.description.clone(),
            category: req.category.clone(),
            report_kind: req.report_kind.to_string(),
        });

        let config = self.config.lock().unwrap().clone();
        if config.fail_reports {
            return Err(Error::Matching("mock matching service down".to_string()));
        }

        Ok(MatchReportResponse {
            external_id: config.external_id,
            embedding: config.embedding,
            matches: match req.report_kind {
                foundry_core::ReportKind::Lost => config.matches,
                foundry_core::ReportKind::Found => Vec::new(),
            },
        })
    }

    async fn find_similar(&self, _embedding: &[f32], top_k: usize) -> Vec<SimilarCandidate> {
        self.call_log
            .lock()
            .unwrap()
            .push(MockCall::FindSimilar { top_k });

        let config = self.config.lock().unwrap().clone();
        config.similar.into_iter().take(top_k).collect()
    }
}
