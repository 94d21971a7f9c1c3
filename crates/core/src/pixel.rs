use std::fmt;

use serde::{Deserialize, Serialize};

/// Named counter events fired for download requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DownloadsPixelName {
    #[serde(rename = "m_download_request_started")]
    DownloadRequestStarted,
    #[serde(rename = "m_download_request_succeeded")]
    DownloadRequestSucceeded,
    #[serde(rename = "m_download_request_failed")]
    DownloadRequestFailed,
}

impl DownloadsPixelName {
    /// Stable wire name of the event.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DownloadRequestStarted => "m_download_request_started",
            Self::DownloadRequestSucceeded => "m_download_request_succeeded",
            Self::DownloadRequestFailed => "m_download_request_failed",
        }
    }
}

impl fmt::Display for DownloadsPixelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
