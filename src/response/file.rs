//! File storage for uploaded sources and downloaded results

use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;

/// Handler for file storage operations rooted at one directory
#[derive(Debug, Clone)]
pub struct FileHandler {
    storage_path: PathBuf,
}

impl FileHandler {
    /// Create a new file handler
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// Ensure the storage directory exists
    pub async fn ensure_storage_dir(&self) -> Result<()> {
        if !fs::try_exists(&self.storage_path).await.unwrap_or(false) {
            fs::create_dir_all(&self.storage_path).await?;
            debug!(path = ?self.storage_path, "Created storage directory");
        }
        Ok(())
    }

    /// Save raw bytes under a fresh unique name with the given extension
    pub async fn save_raw(&self, data: &[u8], extension: &str) -> Result<PathBuf> {
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        self.save_named(&filename, data).await
    }

    /// Save bytes under a fixed name, replacing any previous file
    pub async fn save_named(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        self.ensure_storage_dir().await?;

        let file_path = self.storage_path.join(filename);
        fs::write(&file_path, data).await?;

        debug!(path = ?file_path, size = data.len(), "Saved image file");

        Ok(file_path)
    }

    /// Clean up old files (files older than max_age_secs)
    pub async fn cleanup(&self, max_age_secs: u64) -> Result<usize> {
        if !fs::try_exists(&self.storage_path).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut deleted = 0;
        let now = std::time::SystemTime::now();
        let max_age = std::time::Duration::from_secs(max_age_secs);

        let mut entries = fs::read_dir(&self.storage_path).await?;

        while let Some(entry) = entries.next_entry().await? {
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let expired = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age);
            if expired && fs::remove_file(entry.path()).await.is_ok() {
                deleted += 1;
                debug!(path = ?entry.path(), "Deleted old file");
            }
        }

        Ok(deleted)
    }
}

/// Detect a supported image media type from magic bytes
pub fn detect_media_type(data: &[u8]) -> Option<&'static str> {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    None
}

/// File extension for a supported media type
pub fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" => "jpg",
        _ => "png",
    }
}
