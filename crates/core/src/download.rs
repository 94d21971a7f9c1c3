use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Download id used for downloads that are not tracked by a system download
/// manager (data URIs, direct file writes).
pub const DIRECT_DOWNLOAD_ID: i64 = 0;

/// Lifecycle status of a stored download.
///
/// Persisted as an integer (`0` started, `1` finished).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum DownloadStatus {
    Started,
    Finished,
}

impl From<DownloadStatus> for i32 {
    fn from(status: DownloadStatus) -> Self {
        match status {
            DownloadStatus::Started => 0,
            DownloadStatus::Finished => 1,
        }
    }
}

impl TryFrom<i32> for DownloadStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Started),
            1 => Ok(Self::Finished),
            other => Err(format!("unknown download status: {other}")),
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("started"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

/// A download known to the downloads repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadItem {
    /// Id assigned by the system download manager, or
    /// [`DIRECT_DOWNLOAD_ID`] for direct downloads.
    pub download_id: i64,

    /// Current lifecycle status.
    pub status: DownloadStatus,

    /// File name on disk (no directory component).
    pub file_name: String,

    /// Size in bytes. Zero until the download finishes.
    pub content_length: u64,

    /// Absolute path of the downloaded file.
    pub file_path: String,

    /// When the download was first recorded.
    pub created_at: DateTime<Utc>,
}

impl DownloadItem {
    /// Create a freshly started download with `created_at` set to now.
    #[must_use]
    pub fn started(
        download_id: i64,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            download_id,
            status: DownloadStatus::Started,
            file_name: file_name.into(),
            content_length: 0,
            file_path: file_path.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether this download bypasses the system download manager.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.download_id == DIRECT_DOWNLOAD_ID
    }
}
