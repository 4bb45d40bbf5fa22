//! Shared test support: an in-memory item repository so the pipeline and
//! HTTP surface can be exercised without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use foundry_core::{
    new_v7, EnrichmentStatus, Error, Item, ItemRepository, ItemStatus, MatchCandidate, NewItem,
    ReportKind, Result,
};

/// In-memory ItemRepository for deterministic tests.
#[derive(Clone, Default)]
pub struct MemoryItemRepository {
    items: Arc<Mutex<Vec<Item>>>,
    fail_inserts: bool,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store outage for inserts.
    pub fn failing() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            fail_inserts: true,
        }
    }

    /// Snapshot of all stored items.
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.lock().unwrap().clone()
    }

    /// Directly seed a stored item (bypassing the pipeline).
    pub fn seed(&self, item: Item) {
        self.items.lock().unwrap().push(item);
    }
}

fn newest_first(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item> {
        if self.fail_inserts {
            return Err(Error::Storage("simulated store outage".to_string()));
        }

        let now = Utc::now();
        let (date_lost, date_found) = match item.report_kind {
            ReportKind::Lost => (Some(item.date), None),
            ReportKind::Found => (None, Some(item.date)),
        };

        let stored = Item {
            id: new_v7(),
            external_id: None,
            item_type: item.item_type,
            category: item.category,
            description: item.description,
            location: item.location,
            date_lost,
            date_found,
            contact_info: item.contact_info,
            contact_number: item.contact_number,
            reporter_name: item.reporter_name,
            image_url: item.image_url,
            report_kind: item.report_kind,
            status: ItemStatus::Active,
            enrichment: EnrichmentStatus::Pending,
            matches: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.items.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn fetch(&self, id: Uuid) -> Result<Item> {
        self.items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(Error::ItemNotFound(id))
    }

    async fn fetch_by_external_id(&self, external_id: &str) -> Result<Option<Item>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Item>> {
        Ok(newest_first(self.items.lock().unwrap().clone()))
    }

    async fn list_by_kind(&self, kind: ReportKind) -> Result<Vec<Item>> {
        Ok(newest_first(
            self.items
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.report_kind == kind)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_contact(&self, contact: &str) -> Result<Vec<Item>> {
        Ok(newest_first(
            self.items
                .lock()
                .unwrap()
                .iter()
                .filter(|i| i.contact_info.eq_ignore_ascii_case(contact))
                .cloned()
                .collect(),
        ))
    }

    async fn record_enrichment(
        &self,
        id: Uuid,
        external_id: Option<&str>,
        status: EnrichmentStatus,
    ) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(Error::ItemNotFound(id))?;

        if item.external_id.is_none() {
            item.external_id = external_id.map(String::from);
        }
        item.enrichment = status;
        item.updated_at = Utc::now();
        Ok(())
    }

    async fn update_matches(&self, id: Uuid, matches: &[MatchCandidate]) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(Error::ItemNotFound(id))?;

        item.matches = matches.to_vec();
        item.updated_at = Utc::now();
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: ItemStatus) -> Result<()> {
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(Error::ItemNotFound(id))?;

        item.status = status;
        item.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() < before)
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.items.lock().unwrap().len() as i64)
    }
}
