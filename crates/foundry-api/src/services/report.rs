//! The report submission pipeline.
//!
//! `submit_report` runs an explicit sequence of independent steps with
//! documented partial-failure outcomes:
//!
//! 1. validate the payload — failure blocks persistence entirely;
//! 2. persist the item — failure aborts the request;
//! 3. enrich through the matching service — failure degrades: the item
//!    stays persisted, `enrichment` is marked failed, the response is
//!    still a success;
//! 4. for lost reports, hydrate the returned candidates from the store
//!    and attach them;
//! 5. for found reports, run a similarity query and notify both parties
//!    of every candidate above the confidence threshold — notification
//!    failures are logged, never surfaced.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use foundry_core::{
    defaults, EnrichmentStatus, Item, ItemRepository, Mailer, MatchReportRequest,
    MatchReportResponse, MatchingBackend, ReportKind, ReportPayload, Result, SimilarCandidate,
};

/// Orchestrates validation, persistence, enrichment, and notification
/// for report submissions.
#[derive(Clone)]
pub struct ReportService {
    items: Arc<dyn ItemRepository>,
    matching: Arc<dyn MatchingBackend>,
    mailer: Arc<dyn Mailer>,
}

impl ReportService {
    /// Create a new report service over injected collaborators.
    pub fn new(
        items: Arc<dyn ItemRepository>,
        matching: Arc<dyn MatchingBackend>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            items,
            matching,
            mailer,
        }
    }

    /// Submit a lost or found report.
    ///
    /// Every successful return carries a persisted item; enrichment
    /// fields are populated only if the matching service responded
    /// within this request.
    pub async fn submit_report(&self, kind: ReportKind, payload: ReportPayload) -> Result<Item> {
        let start = Instant::now();

        let new_item = payload.into_new_item(kind)?;
        let item = self.items.insert(new_item).await?;

        info!(
            subsystem = "api",
            component = "report_service",
            op = "submit_report",
            item_id = %item.id,
            report_kind = %kind,
            "Report persisted"
        );

        let request = MatchReportRequest {
            image_url: item.image_url.clone().unwrap_or_default(),
            description: item.description.clone(),
            location: item.location.clone(),
            category: item
                .category
                .map(|c| c.as_str().to_string())
                .unwrap_or_else(|| item.item_type.clone()),
            report_kind: kind,
        };

        let response = match self.matching.report(request).await {
            Ok(response) => response,
            Err(e) => {
                // Best-effort enrichment: a matching outage never blocks
                // the primary write.
                warn!(
                    subsystem = "api",
                    component = "report_service",
                    op = "submit_report",
                    item_id = %item.id,
                    error = %e,
                    "Matching service unavailable; item persisted without enrichment"
                );
                let mut item = item;
                item.enrichment = EnrichmentStatus::Failed;
                if let Err(store_err) = self
                    .items
                    .record_enrichment(item.id, None, EnrichmentStatus::Failed)
                    .await
                {
                    warn!(
                        subsystem = "api",
                        component = "report_service",
                        item_id = %item.id,
                        error = %store_err,
                        "Could not record enrichment outcome"
                    );
                }
                return Ok(item);
            }
        };

        self.items
            .record_enrichment(item.id, Some(&response.external_id), EnrichmentStatus::Complete)
            .await?;

        if kind == ReportKind::Lost {
            self.attach_candidates(&item, &response).await?;
        }

        let item = self.items.fetch(item.id).await?;

        if kind == ReportKind::Found {
            match &response.embedding {
                Some(embedding) => {
                    let similar = self
                        .matching
                        .find_similar(embedding, defaults::MATCH_TOP_K)
                        .await;
                    self.notify_matches(&item, &similar).await;
                }
                None => debug!(
                    subsystem = "api",
                    component = "report_service",
                    item_id = %item.id,
                    "No embedding handle returned; skipping similarity pass"
                ),
            }
        }

        info!(
            subsystem = "api",
            component = "report_service",
            op = "submit_report",
            item_id = %item.id,
            report_kind = %kind,
            duration_ms = start.elapsed().as_millis() as u64,
            "Report submission complete"
        );

        Ok(item)
    }

    /// Hydrate the ranked candidates of a lost report from the store and
    /// persist them on the item. Candidates whose external id resolves to
    /// nothing are skipped.
    async fn attach_candidates(&self, item: &Item, response: &MatchReportResponse) -> Result<()> {
        if response.matches.is_empty() {
            return Ok(());
        }

        let mut candidates = Vec::with_capacity(response.matches.len());
        for ranked in &response.matches {
            match self.items.fetch_by_external_id(&ranked.external_id).await? {
                Some(counterpart) => {
                    candidates.push(counterpart.to_match_candidate(
                        ranked.score,
                        if ranked.reason.is_empty() {
                            "Image and description are semantically similar"
                        } else {
                            ranked.reason.as_str()
                        },
                    ));
                }
                None => debug!(
                    subsystem = "api",
                    component = "report_service",
                    external_id = %ranked.external_id,
                    "Candidate external id has no stored counterpart"
                ),
            }
        }

        if !candidates.is_empty() {
            self.items.update_matches(item.id, &candidates).await?;
        }
        Ok(())
    }

    /// Notify both parties of every candidate above the confidence
    /// threshold. Lookup and delivery failures are logged, never
    /// surfaced: the found-item submission already succeeded.
    async fn notify_matches(&self, found_item: &Item, similar: &[SimilarCandidate]) {
        for candidate in similar {
            if candidate.score <= defaults::MATCH_SCORE_THRESHOLD {
                continue;
            }

            let lost_item = match self.items.fetch_by_external_id(&candidate.external_id).await {
                Ok(Some(item)) if item.report_kind == ReportKind::Lost => item,
                Ok(Some(_)) => {
                    debug!(
                        subsystem = "api",
                        component = "report_service",
                        external_id = %candidate.external_id,
                        "High-score candidate is not a lost item; skipping"
                    );
                    continue;
                }
                Ok(None) => {
                    debug!(
                        subsystem = "api",
                        component = "report_service",
                        external_id = %candidate.external_id,
                        "High-score candidate has no stored counterpart"
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        subsystem = "api",
                        component = "report_service",
                        external_id = %candidate.external_id,
                        error = %e,
                        "Candidate lookup failed during notification pass"
                    );
                    continue;
                }
            };

            let delivered = self
                .mailer
                .send_match_notification(&lost_item, found_item, candidate.score)
                .await;

            if delivered {
                info!(
                    subsystem = "api",
                    component = "report_service",
                    op = "notify",
                    item_id = %lost_item.id,
                    score = candidate.score,
                    "Match notification sent"
                );
            } else {
                warn!(
                    subsystem = "api",
                    component = "report_service",
                    op = "notify",
                    item_id = %lost_item.id,
                    score = candidate.score,
                    "Match notification delivery failed"
                );
            }
        }
    }
}
