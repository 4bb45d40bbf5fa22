//! # foundry-db
//!
//! PostgreSQL database layer for the Foundry lost-and-found service.
//!
//! This crate provides:
//! - Connection pool management
//! - The item repository
//! - Image storage backends (filesystem default)
//!
//! ## Example
//!
//! ```rust,ignore
//! use foundry_core::{ItemRepository, NewItem, ReportKind};
//! use foundry_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/foundry").await?;
//!
//!     let item = db.items.insert(NewItem {
//!         report_kind: ReportKind::Found,
//!         item_type: "key".to_string(),
//!         category: None,
//!         description: "small silver key".to_string(),
//!         location: "Library".to_string(),
//!         date: chrono::Utc::now(),
//!         contact_info: "finder@example.edu".to_string(),
//!         contact_number: None,
//!         reporter_name: None,
//!         image_url: None,
//!     }).await?;
//!
//!     println!("Stored item: {}", item.id);
//!     Ok(())
//! }
//! ```

pub mod images;
pub mod items;
pub mod pool;

// Re-export core types
pub use foundry_core::*;

// Re-export repository and storage implementations
pub use images::{
    generate_public_id, sniff_image_format, FilesystemImageStorage, ImageStorageBackend,
    StoredImage,
};
pub use items::PgItemRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Item repository for CRUD operations.
    pub items: PgItemRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            items: PgItemRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close the connection pool (graceful shutdown).
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            items: PgItemRepository::new(self.pool.clone()),
            pool: self.pool.clone(),
        }
    }
}
