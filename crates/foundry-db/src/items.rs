//! Item repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use uuid::Uuid;

use foundry_core::{
    new_v7, EnrichmentStatus, Error, Item, ItemCategory, ItemRepository, ItemStatus,
    MatchCandidate, NewItem, ReportKind, Result,
};

const ITEM_COLUMNS: &str = "id, external_id, item_type, category, description, location, \
     date_lost, date_found, contact_info, contact_number, reporter_name, image_url, \
     report_type, status, enrichment, matches, created_at, updated_at";

/// PostgreSQL implementation of ItemRepository.
pub struct PgItemRepository {
    pool: Pool<Postgres>,
}

impl PgItemRepository {
    /// Create a new PgItemRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to an Item.
fn map_row_to_item(row: PgRow) -> Result<Item> {
    let report_type: String = row.get("report_type");
    let report_kind = ReportKind::parse(&report_type)
        .ok_or_else(|| Error::Internal(format!("unknown report_type in store: {report_type}")))?;

    let status: String = row.get("status");
    let status = ItemStatus::parse(&status).unwrap_or_default();

    let enrichment: String = row.get("enrichment");
    let enrichment = EnrichmentStatus::parse(&enrichment).unwrap_or_default();

    let category: Option<String> = row.get("category");
    let category = category.as_deref().and_then(ItemCategory::parse);

    let matches: serde_json::Value = row.get("matches");
    let matches: Vec<MatchCandidate> = serde_json::from_value(matches).unwrap_or_default();

    Ok(Item {
        id: row.get("id"),
        external_id: row.get("external_id"),
        item_type: row.get("item_type"),
        category,
        description: row.get("description"),
        location: row.get("location"),
        date_lost: row.get("date_lost"),
        date_found: row.get("date_found"),
        contact_info: row.get("contact_info"),
        contact_number: row.get("contact_number"),
        reporter_name: row.get("reporter_name"),
        image_url: row.get("image_url"),
        report_kind,
        status,
        enrichment,
        matches,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_rows_to_items(rows: Vec<PgRow>) -> Result<Vec<Item>> {
    rows.into_iter().map(map_row_to_item).collect()
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn insert(&self, item: NewItem) -> Result<Item> {
        let id = new_v7();
        let now = Utc::now();

        let (date_lost, date_found) = match item.report_kind {
            ReportKind::Lost => (Some(item.date), None),
            ReportKind::Found => (None, Some(item.date)),
        };

        sqlx::query(
            "INSERT INTO item (id, item_type, category, description, location, \
             date_lost, date_found, contact_info, contact_number, reporter_name, image_url, \
             report_type, status, enrichment, matches, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
             '[]'::jsonb, $15, $15)",
        )
        .bind(id)
        .bind(&item.item_type)
        .bind(item.category.map(|c| c.as_str()))
        .bind(&item.description)
        .bind(&item.location)
        .bind(date_lost)
        .bind(date_found)
        .bind(&item.contact_info)
        .bind(&item.contact_number)
        .bind(&item.reporter_name)
        .bind(&item.image_url)
        .bind(item.report_kind.as_str())
        .bind(ItemStatus::Active.as_str())
        .bind(EnrichmentStatus::Pending.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(Item {
            id,
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
        })
    }

    async fn fetch(&self, id: Uuid) -> Result<Item> {
        let row = sqlx::query(&format!("SELECT {ITEM_COLUMNS} FROM item WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => map_row_to_item(row),
            None => Err(Error::ItemNotFound(id)),
        }
    }

    async fn fetch_by_external_id(&self, external_id: &str) -> Result<Option<Item>> {
        let row = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM item WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_row_to_item).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM item ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        map_rows_to_items(rows)
    }

    async fn list_by_kind(&self, kind: ReportKind) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM item WHERE report_type = $1 ORDER BY created_at DESC"
        ))
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        map_rows_to_items(rows)
    }

    async fn list_by_contact(&self, contact: &str) -> Result<Vec<Item>> {
        let rows = sqlx::query(&format!(
            "SELECT {ITEM_COLUMNS} FROM item \
             WHERE LOWER(contact_info) = LOWER($1) ORDER BY created_at DESC"
        ))
        .bind(contact)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        map_rows_to_items(rows)
    }

    async fn record_enrichment(
        &self,
        id: Uuid,
        external_id: Option<&str>,
        status: EnrichmentStatus,
    ) -> Result<()> {
        // COALESCE keeps an already-assigned external id: the field is
        // set at most once per item.
        let result = sqlx::query(
            "UPDATE item SET external_id = COALESCE(external_id, $2), \
             enrichment = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(external_id)
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ItemNotFound(id));
        }
        Ok(())
    }

    async fn update_matches(&self, id: Uuid, matches: &[MatchCandidate]) -> Result<()> {
        let matches = serde_json::to_value(matches)?;
        let result = sqlx::query(
            "UPDATE item SET matches = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(matches)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ItemNotFound(id));
        }
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: ItemStatus) -> Result<()> {
        let result = sqlx::query("UPDATE item SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ItemNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM item")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.get("total"))
    }
}
