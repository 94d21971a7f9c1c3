use std::path::PathBuf;

use thiserror::Error;

use harbor_core::HarborError;
use harbor_datauri::DataUriError;
use harbor_store::StoreError;

/// Errors that can occur while reporting or performing a download.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The downloads repository failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No stored download has the given download-manager id.
    #[error("no download with id {0}")]
    NotFound(i64),

    /// The URL is not a `data:` URI.
    #[error("not a data uri")]
    InvalidDataUri,

    /// The data URI payload could not be decoded.
    #[error(transparent)]
    DataUri(#[from] DataUriError),

    /// Writing the downloaded file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<DownloadError> for HarborError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Store(e) => Self::Store(e.to_string()),
            DownloadError::DataUri(e) => Self::DataUri(e.to_string()),
            DownloadError::InvalidDataUri => Self::DataUri(err.to_string()),
            other => Self::Download(other.to_string()),
        }
    }
}
