//! Image storage with a pluggable backend and filesystem default.
//!
//! Uploaded report photos are stored content-addressed (SHA-256 prefix)
//! so re-uploads of the same image land on the same public id, and served
//! through a configurable public base URL.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use foundry_core::{defaults, Error, Result};

/// Metadata for a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Durable public URL for the image.
    pub url: String,
    /// Opaque identifier used for later deletion.
    pub public_id: String,
    /// Image format (file extension, e.g. "webp", "jpg").
    pub format: String,
    /// Size of the stored bytes.
    pub size_bytes: usize,
}

/// Storage backend trait for image hosting implementations.
///
/// Allows abstracting over filesystem, S3, or other storage providers.
#[async_trait]
pub trait ImageStorageBackend: Send + Sync {
    /// Store an image and return its durable URL and metadata. Rejects
    /// payloads that are not images.
    async fn store(&self, folder: &str, data: &[u8]) -> Result<StoredImage>;

    /// Delete a stored image by public id. A miss is not an error.
    async fn delete(&self, public_id: &str) -> Result<()>;

    /// Check whether an image with this public id exists.
    async fn exists(&self, public_id: &str) -> Result<bool>;
}

/// Compute the content-derived public id for an image.
///
/// Format: `{folder}-{first-16-hex-of-sha256}`.
pub fn generate_public_id(folder: &str, data: &[u8]) -> String {
    let hash = hex::encode(Sha256::digest(data));
    format!("{}-{}", folder, &hash[..16])
}

/// Sniff the image format from magic bytes. Returns the canonical file
/// extension, or a validation error for non-image payloads.
pub fn sniff_image_format(data: &[u8]) -> Result<&'static str> {
    match infer::get(data) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(kind.extension()),
        _ => Err(Error::Validation("Only image files are allowed".to_string())),
    }
}

/// Reject public ids that could escape the storage directory.
fn validate_public_id(public_id: &str) -> Result<()> {
    let ok = !public_id.is_empty()
        && public_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(format!("Invalid public id: {public_id}")))
    }
}

/// Filesystem image storage.
///
/// Stores images flat under a base directory as `{public_id}.{ext}` and
/// exposes them at `{base_url}/{public_id}.{ext}`.
pub struct FilesystemImageStorage {
    base_path: PathBuf,
    base_url: String,
}

impl FilesystemImageStorage {
    /// Create a new filesystem image storage.
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create from `IMAGE_STORAGE_PATH` / `IMAGE_BASE_URL` environment
    /// variables, falling back to the centralized defaults.
    pub fn from_env() -> Self {
        let base_path = std::env::var("IMAGE_STORAGE_PATH")
            .unwrap_or_else(|_| defaults::IMAGE_STORAGE_PATH.to_string());
        let base_url = std::env::var("IMAGE_BASE_URL")
            .unwrap_or_else(|_| defaults::IMAGE_BASE_URL.to_string());
        Self::new(base_path, base_url)
    }

    /// Validate that the backend can write, read, and delete files.
    ///
    /// Performs a full round-trip at startup to catch filesystem issues
    /// (permission errors, missing directories) early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_file = self.base_path.join(".health-check");

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", self.base_path, e))?;

        let data = b"storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_back = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_back != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;

        Ok(())
    }

    fn file_name(public_id: &str, format: &str) -> String {
        format!("{public_id}.{format}")
    }
}

#[async_trait]
impl ImageStorageBackend for FilesystemImageStorage {
    async fn store(&self, folder: &str, data: &[u8]) -> Result<StoredImage> {
        let format = sniff_image_format(data)?;
        let public_id = generate_public_id(folder, data);
        validate_public_id(&public_id)?;

        let file_name = Self::file_name(&public_id, format);
        let full_path = self.base_path.join(&file_name);

        debug!(
            subsystem = "db",
            component = "image_storage",
            op = "store",
            public_id = %public_id,
            size = data.len(),
            "Storing image"
        );

        fs::create_dir_all(&self.base_path).await?;

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "image_storage: File::create failed");
            e
        })?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &full_path).await?;

        Ok(StoredImage {
            url: format!("{}/{}", self.base_url, file_name),
            public_id,
            format: format.to_string(),
            size_bytes: data.len(),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        validate_public_id(public_id)?;

        let prefix = format!("{public_id}.");
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(&prefix) {
                fs::remove_file(entry.path()).await?;
            }
        }
        Ok(())
    }

    async fn exists(&self, public_id: &str) -> Result<bool> {
        validate_public_id(public_id)?;

        let prefix = format!("{public_id}.");
        let mut entries = fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_string_lossy().starts_with(&prefix) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG header: enough for magic-byte sniffing.
    const PNG_MAGIC: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ];

    #[test]
    fn test_public_id_is_stable_for_same_content() {
        let a = generate_public_id("foundry", b"same bytes");
        let b = generate_public_id("foundry", b"same bytes");
        assert_eq!(a, b);
        assert!(a.starts_with("foundry-"));
    }

    #[test]
    fn test_public_id_differs_for_different_content() {
        let a = generate_public_id("foundry", b"one");
        let b = generate_public_id("foundry", b"two");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sniff_rejects_non_image() {
        let err = sniff_image_format(b"just some text").unwrap_err();
        assert!(err.to_string().contains("Only image files are allowed"));
    }

    #[test]
    fn test_sniff_accepts_png() {
        assert_eq!(sniff_image_format(PNG_MAGIC).unwrap(), "png");
    }

    #[test]
    fn test_validate_public_id_rejects_traversal() {
        assert!(validate_public_id("../../etc/passwd").is_err());
        assert!(validate_public_id("foundry/abc").is_err());
        assert!(validate_public_id("").is_err());
        assert!(validate_public_id("foundry-abc123").is_ok());
    }

    #[tokio::test]
    async fn test_store_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage =
            FilesystemImageStorage::new(dir.path(), "http://localhost:5000/images/");

        let stored = storage.store("found-items", PNG_MAGIC).await.unwrap();
        assert_eq!(stored.format, "png");
        assert_eq!(stored.size_bytes, PNG_MAGIC.len());
        assert!(stored
            .url
            .starts_with("http://localhost:5000/images/found-items-"));
        assert!(storage.exists(&stored.public_id).await.unwrap());

        storage.delete(&stored.public_id).await.unwrap();
        assert!(!storage.exists(&stored.public_id).await.unwrap());

        // Deleting again is a no-op, not an error.
        storage.delete(&stored.public_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_rejects_text_payload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemImageStorage::new(dir.path(), "http://localhost");
        assert!(storage.store("foundry", b"not an image").await.is_err());
    }
}
