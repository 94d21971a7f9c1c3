use async_trait::async_trait;
use harbor_core::{DownloadItem, DownloadStatus};

use crate::error::StoreError;

/// Trait for persisting downloads.
///
/// Several direct downloads may share the download id `0`, so lookups by id
/// are only meaningful for downloads tracked by a system download manager.
/// Implementations must be `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait DownloadsRepository: Send + Sync {
    /// Record a new download.
    async fn insert(&self, item: DownloadItem) -> Result<(), StoreError>;

    /// Set status and content length for every download with `download_id`.
    /// Returns the number of downloads updated.
    async fn update_by_id(
        &self,
        download_id: i64,
        status: DownloadStatus,
        content_length: u64,
    ) -> Result<u64, StoreError>;

    /// Set status and content length for every download named `file_name`.
    /// Returns the number of downloads updated.
    async fn update_by_file_name(
        &self,
        file_name: &str,
        status: DownloadStatus,
        content_length: u64,
    ) -> Result<u64, StoreError>;

    /// Get the download with `download_id`. Returns `None` if not found.
    async fn get_download_item(&self, download_id: i64)
    -> Result<Option<DownloadItem>, StoreError>;

    /// All downloads, newest first.
    async fn get_downloads(&self) -> Result<Vec<DownloadItem>, StoreError>;

    /// Delete downloads with `download_id`. Returns the number removed.
    async fn delete(&self, download_id: i64) -> Result<u64, StoreError>;

    /// Delete every download. Returns the number removed.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

