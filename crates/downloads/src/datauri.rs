use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use harbor_core::{DIRECT_DOWNLOAD_ID, DownloadFailReason, DownloadItem};
use harbor_datauri::{DataUriParser, ParseResult};

use crate::callback::DownloadCallback;
use crate::error::DownloadError;

/// Saves the payload of a `data:` URI to disk, reporting each step to a
/// [`DownloadCallback`].
pub struct DataUriDownloader {
    parser: DataUriParser,
    callback: Arc<dyn DownloadCallback>,
}

impl DataUriDownloader {
    pub fn new(parser: DataUriParser, callback: Arc<dyn DownloadCallback>) -> Self {
        Self { parser, callback }
    }

    /// Decode `url` and write it into `directory` under a generated name.
    ///
    /// Failures are reported through the callback before being returned.
    pub async fn download(
        &self,
        url: &str,
        directory: &Path,
    ) -> Result<PathBuf, DownloadError> {
        let ParseResult::ParsedDataUri(parsed) = self.parser.generate(url) else {
            warn!("refusing to download an invalid data uri");
            self.fail(url, DownloadFailReason::DataUriParseException).await;
            return Err(DownloadError::InvalidDataUri);
        };

        let file_name = parsed.filename.to_string();
        let directory =
            std::path::absolute(directory).unwrap_or_else(|_| directory.to_path_buf());
        let path = directory.join(&file_name);

        // The payload is decoded and on disk before the download is recorded,
        // so a failure never leaves a started row behind.
        let bytes = match parsed.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file_name = %file_name, error = %e, "data uri payload is malformed");
                self.fail(url, DownloadFailReason::DataUriParseException).await;
                return Err(e.into());
            }
        };

        if let Err(source) = write_file(&directory, &path, &bytes).await {
            warn!(
                path = %path.display(),
                error = %source,
                "failed to write data uri payload"
            );
            self.fail(url, DownloadFailReason::Other).await;
            return Err(DownloadError::Io { path, source });
        }

        self.callback
            .on_start(DownloadItem::started(
                DIRECT_DOWNLOAD_ID,
                &file_name,
                path.display().to_string(),
            ))
            .await?;

        info!(
            path = %path.display(),
            bytes = bytes.len(),
            mime_type = %parsed.mime_type,
            "saved data uri"
        );

        let mime_type = (!parsed.mime_type.is_empty()).then_some(parsed.mime_type.as_str());
        self.callback.on_success_file(&path, mime_type).await?;
        Ok(path)
    }

    async fn fail(&self, url: &str, reason: DownloadFailReason) {
        self.callback
            .on_failure(Some(DIRECT_DOWNLOAD_ID), Some(url), reason)
            .await;
    }
}

async fn write_file(directory: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(directory).await?;
    tokio::fs::write(path, bytes).await
}
