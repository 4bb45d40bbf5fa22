//! Report pipeline tests: validation, persistence, best-effort
//! enrichment, match hydration, and notification dispatch.

mod support;

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use foundry_api::services::ReportService;
use foundry_core::{
    EnrichmentStatus, Item, ItemRepository, ItemStatus, RankedCandidate, ReportKind,
    ReportPayload, SimilarCandidate,
};
use foundry_match::MockMatchingBackend;
use foundry_notify::RecordingMailer;
use support::MemoryItemRepository;

fn payload(kind: ReportKind) -> ReportPayload {
    let date = Some(Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap());
    ReportPayload {
        item_type: Some("key".to_string()),
        description: Some("small silver key".to_string()),
        location: Some("Library".to_string()),
        date_lost: (kind == ReportKind::Lost).then_some(date).flatten(),
        date_found: (kind == ReportKind::Found).then_some(date).flatten(),
        contact_info: Some("reporter@example.edu".to_string()),
        ..Default::default()
    }
}

fn stored_item(kind: ReportKind, external_id: &str, contact: &str) -> Item {
    let date = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    Item {
        id: foundry_core::new_v7(),
        external_id: Some(external_id.to_string()),
        item_type: "key".to_string(),
        category: None,
        description: "a key someone reported".to_string(),
        location: "Gym".to_string(),
        date_lost: (kind == ReportKind::Lost).then_some(date),
        date_found: (kind == ReportKind::Found).then_some(date),
        contact_info: contact.to_string(),
        contact_number: None,
        reporter_name: None,
        image_url: None,
        report_kind: kind,
        status: ItemStatus::Active,
        enrichment: EnrichmentStatus::Complete,
        matches: vec![],
        created_at: date,
        updated_at: date,
    }
}

fn service(
    repo: &MemoryItemRepository,
    matching: &MockMatchingBackend,
    mailer: &RecordingMailer,
) -> ReportService {
    ReportService::new(
        Arc::new(repo.clone()),
        Arc::new(matching.clone()),
        Arc::new(mailer.clone()),
    )
}

#[tokio::test]
async fn lost_report_echoes_input_and_is_enriched() {
    let repo = MemoryItemRepository::new();
    let matching = MockMatchingBackend::new().with_external_id("LOST-KEY-A9F2");
    let mailer = RecordingMailer::new();

    let item = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Lost, payload(ReportKind::Lost))
        .await
        .unwrap();

    assert_eq!(item.item_type, "key");
    assert_eq!(item.description, "small silver key");
    assert_eq!(item.location, "Library");
    assert_eq!(item.report_kind, ReportKind::Lost);
    assert_eq!(item.status, ItemStatus::Active);
    assert!(item.date_lost.is_some());
    assert!(item.date_found.is_none());
    assert!(item.created_at <= item.updated_at);
    assert_eq!(item.external_id.as_deref(), Some("LOST-KEY-A9F2"));
    assert_eq!(item.enrichment, EnrichmentStatus::Complete);
    assert_eq!(repo.snapshot().len(), 1);
}

#[tokio::test]
async fn invalid_payload_performs_no_persistence() {
    let repo = MemoryItemRepository::new();
    let matching = MockMatchingBackend::new();
    let mailer = RecordingMailer::new();

    let err = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Lost, ReportPayload::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Missing required fields"));
    assert!(repo.snapshot().is_empty());
    assert_eq!(matching.report_calls(), 0);
}

#[tokio::test]
async fn matching_outage_still_returns_persisted_item() {
    let repo = MemoryItemRepository::new();
    let matching = MockMatchingBackend::new().failing();
    let mailer = RecordingMailer::new();

    let item = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Lost, payload(ReportKind::Lost))
        .await
        .unwrap();

    assert!(item.external_id.is_none());
    assert!(item.matches.is_empty());
    assert_eq!(item.enrichment, EnrichmentStatus::Failed);

    // The item is durable and carries the failed-enrichment marker.
    let stored = &repo.snapshot()[0];
    assert_eq!(stored.id, item.id);
    assert_eq!(stored.enrichment, EnrichmentStatus::Failed);
}

#[tokio::test]
async fn store_outage_fails_the_submission() {
    let repo = MemoryItemRepository::failing();
    let matching = MockMatchingBackend::new();
    let mailer = RecordingMailer::new();

    let err = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Lost, payload(ReportKind::Lost))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Storage error"));
    assert_eq!(matching.report_calls(), 0);
}

#[tokio::test]
async fn lost_report_hydrates_candidates_from_store() {
    let repo = MemoryItemRepository::new();
    repo.seed(stored_item(
        ReportKind::Found,
        "FOUND-KEY-0001",
        "finder@example.edu",
    ));

    let matching = MockMatchingBackend::new()
        .with_external_id("LOST-KEY-0002")
        .with_matches(vec![
            RankedCandidate {
                external_id: "FOUND-KEY-0001".to_string(),
                score: 0.91,
                confidence: "High".to_string(),
                reason: "Image and description are semantically similar".to_string(),
            },
            RankedCandidate {
                external_id: "FOUND-GHOST-9999".to_string(),
                score: 0.88,
                confidence: "High".to_string(),
                reason: String::new(),
            },
        ]);
    let mailer = RecordingMailer::new();

    let item = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Lost, payload(ReportKind::Lost))
        .await
        .unwrap();

    // The unknown external id was skipped; the known one was hydrated
    // with the counterpart's stored details.
    assert_eq!(item.matches.len(), 1);
    let candidate = &item.matches[0];
    assert_eq!(candidate.description, "a key someone reported");
    assert_eq!(candidate.location, "Gym");
    assert_eq!(candidate.report_kind, ReportKind::Found);
    assert_eq!(candidate.confidence, "High");
    assert!((candidate.score - 0.91).abs() < f32::EPSILON);
}

#[tokio::test]
async fn found_report_notifies_only_above_threshold() {
    let repo = MemoryItemRepository::new();
    repo.seed(stored_item(
        ReportKind::Lost,
        "LOST-KEY-HIGH",
        "owner-high@example.edu",
    ));
    repo.seed(stored_item(
        ReportKind::Lost,
        "LOST-KEY-EDGE",
        "owner-edge@example.edu",
    ));
    repo.seed(stored_item(
        ReportKind::Lost,
        "LOST-KEY-LOW",
        "owner-low@example.edu",
    ));

    let matching = MockMatchingBackend::new()
        .with_external_id("FOUND-KEY-0003")
        .with_similar(vec![
            SimilarCandidate {
                external_id: "LOST-KEY-HIGH".to_string(),
                score: 0.9,
            },
            // Exactly at the threshold: must NOT notify (strictly greater).
            SimilarCandidate {
                external_id: "LOST-KEY-EDGE".to_string(),
                score: 0.7,
            },
            SimilarCandidate {
                external_id: "LOST-KEY-LOW".to_string(),
                score: 0.5,
            },
        ]);
    let mailer = RecordingMailer::new();

    let found = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Found, payload(ReportKind::Found))
        .await
        .unwrap();

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    let (lost_id, found_id, score) = sent[0];
    assert_eq!(found_id, found.id);
    assert!((score - 0.9).abs() < f32::EPSILON);

    let lost = repo.fetch(lost_id).await.unwrap();
    assert_eq!(lost.external_id.as_deref(), Some("LOST-KEY-HIGH"));
}

#[tokio::test]
async fn found_candidates_that_are_not_lost_items_are_skipped() {
    let repo = MemoryItemRepository::new();
    repo.seed(stored_item(
        ReportKind::Found,
        "FOUND-OTHER-0001",
        "finder@example.edu",
    ));

    let matching = MockMatchingBackend::new()
        .with_external_id("FOUND-KEY-0004")
        .with_similar(vec![SimilarCandidate {
            external_id: "FOUND-OTHER-0001".to_string(),
            score: 0.95,
        }]);
    let mailer = RecordingMailer::new();

    service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Found, payload(ReportKind::Found))
        .await
        .unwrap();

    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn notification_failure_never_aborts_the_submission() {
    let repo = MemoryItemRepository::new();
    repo.seed(stored_item(
        ReportKind::Lost,
        "LOST-KEY-HIGH",
        "owner@example.edu",
    ));

    let matching = MockMatchingBackend::new()
        .with_external_id("FOUND-KEY-0005")
        .with_similar(vec![SimilarCandidate {
            external_id: "LOST-KEY-HIGH".to_string(),
            score: 0.92,
        }]);
    let mailer = RecordingMailer::failing();

    let item = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Found, payload(ReportKind::Found))
        .await
        .unwrap();

    assert_eq!(item.enrichment, EnrichmentStatus::Complete);
    assert_eq!(mailer.sent_count(), 1);
}

#[tokio::test]
async fn found_report_without_embedding_skips_similarity() {
    let repo = MemoryItemRepository::new();
    let matching = MockMatchingBackend::new()
        .with_external_id("FOUND-KEY-0006")
        .with_embedding(None);
    let mailer = RecordingMailer::new();

    service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Found, payload(ReportKind::Found))
        .await
        .unwrap();

    assert_eq!(matching.similar_calls(), 0);
    assert_eq!(mailer.sent_count(), 0);
}

#[tokio::test]
async fn found_report_never_stores_matches() {
    let repo = MemoryItemRepository::new();
    let matching = MockMatchingBackend::new().with_external_id("FOUND-KEY-0007");
    let mailer = RecordingMailer::new();

    let item = service(&repo, &matching, &mailer)
        .submit_report(ReportKind::Found, payload(ReportKind::Found))
        .await
        .unwrap();

    assert!(item.matches.is_empty());
}
