use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use harbor_core::{DownloadItem, DownloadStatus};
use harbor_store::error::StoreError;
use harbor_store::repository::DownloadsRepository;

/// In-memory [`DownloadsRepository`] backed by a [`DashMap`].
///
/// Rows are keyed by an internal insertion sequence so that several direct
/// downloads (all with download id `0`) can coexist.
#[derive(Debug, Default)]
pub struct MemoryDownloadsRepository {
    rows: DashMap<u64, DownloadItem>,
    next_row: AtomicU64,
}

impl MemoryDownloadsRepository {
    /// Create a new, empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `status` and `content_length` to every row matching `predicate`.
    fn update_where(
        &self,
        predicate: impl Fn(&DownloadItem) -> bool,
        status: DownloadStatus,
        content_length: u64,
    ) -> u64 {
        let mut updated = 0;
        for mut row in self.rows.iter_mut() {
            if predicate(row.value()) {
                row.status = status;
                row.content_length = content_length;
                updated += 1;
            }
        }
        updated
    }
}

#[async_trait]
impl DownloadsRepository for MemoryDownloadsRepository {
    async fn insert(&self, item: DownloadItem) -> Result<(), StoreError> {
        let row = self.next_row.fetch_add(1, Ordering::Relaxed);
        self.rows.insert(row, item);
        Ok(())
    }

    async fn update_by_id(
        &self,
        download_id: i64,
        status: DownloadStatus,
        content_length: u64,
    ) -> Result<u64, StoreError> {
        Ok(self.update_where(
            |item| item.download_id == download_id,
            status,
            content_length,
        ))
    }

    async fn update_by_file_name(
        &self,
        file_name: &str,
        status: DownloadStatus,
        content_length: u64,
    ) -> Result<u64, StoreError> {
        Ok(self.update_where(
            |item| item.file_name == file_name,
            status,
            content_length,
        ))
    }

    async fn get_download_item(
        &self,
        download_id: i64,
    ) -> Result<Option<DownloadItem>, StoreError> {
        // Earliest row wins if a manager id was ever reused.
        Ok(self
            .rows
            .iter()
            .filter(|row| row.download_id == download_id)
            .min_by_key(|row| *row.key())
            .map(|row| row.value().clone()))
    }

    async fn get_downloads(&self) -> Result<Vec<DownloadItem>, StoreError> {
        let mut rows: Vec<(u64, DownloadItem)> = self
            .rows
            .iter()
            .map(|row| (*row.key(), row.value().clone()))
            .collect();
        rows.sort_by(|(a_row, a), (b_row, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_row.cmp(a_row))
        });
        Ok(rows.into_iter().map(|(_, item)| item).collect())
    }

    async fn delete(&self, download_id: i64) -> Result<u64, StoreError> {
        // Counted inside `retain` so concurrent inserts cannot skew the result.
        let mut removed = 0;
        self.rows.retain(|_, item| {
            let keep = item.download_id != download_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut removed = 0;
        self.rows.retain(|_, _| {
            removed += 1;
            false
        });
        Ok(removed)
    }
}
