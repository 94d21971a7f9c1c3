use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use tracing::{debug, warn};

use harbor_core::{
    DIRECT_DOWNLOAD_ID, DownloadCommand, DownloadFailReason, DownloadItem, DownloadStatus,
    DownloadsPixelName, MessageId,
};
use harbor_store::DownloadsRepository;

use crate::channel::CommandChannel;
use crate::error::DownloadError;
use crate::pixel::Pixel;

/// Receiver of download lifecycle events.
///
/// Methods may be called concurrently from any task.
#[async_trait]
pub trait DownloadCallback: Send + Sync {
    /// A download was started.
    async fn on_start(&self, item: DownloadItem) -> Result<(), DownloadError>;

    /// A download tracked by the system download manager finished.
    async fn on_success_by_id(
        &self,
        download_id: i64,
        content_length: u64,
    ) -> Result<(), DownloadError>;

    /// A file was written directly, bypassing the download manager.
    async fn on_success_file(
        &self,
        file: &Path,
        mime_type: Option<&str>,
    ) -> Result<(), DownloadError>;

    /// A download failed.
    async fn on_failure(
        &self,
        download_id: Option<i64>,
        url: Option<&str>,
        reason: DownloadFailReason,
    );

    /// Commands produced by the events above. Each command is delivered at
    /// most once, and only the latest unconsumed command is kept.
    fn commands(&self) -> BoxStream<'static, DownloadCommand>;
}

/// [`DownloadCallback`] that records downloads in a repository, fires
/// pixels, and publishes UI commands on a [`CommandChannel`].
///
/// Dropping the callback closes its channel; open command streams end after
/// yielding the command still pending, if any.
pub struct FileDownloadCallback {
    repository: Arc<dyn DownloadsRepository>,
    pixel: Arc<dyn Pixel>,
    channel: Arc<CommandChannel>,
}

impl FileDownloadCallback {
    pub fn new(repository: Arc<dyn DownloadsRepository>, pixel: Arc<dyn Pixel>) -> Self {
        Self {
            repository,
            pixel,
            channel: Arc::new(CommandChannel::new()),
        }
    }

    /// The channel commands are published on.
    pub fn channel(&self) -> &Arc<CommandChannel> {
        &self.channel
    }
}

impl Drop for FileDownloadCallback {
    fn drop(&mut self) {
        self.channel.close();
    }
}

#[async_trait]
impl DownloadCallback for FileDownloadCallback {
    async fn on_start(&self, item: DownloadItem) -> Result<(), DownloadError> {
        debug!(
            file_name = %item.file_name,
            download_id = item.download_id,
            "download started"
        );
        self.pixel.fire(DownloadsPixelName::DownloadRequestStarted);
        self.channel.send(DownloadCommand::ShowDownloadStartedMessage {
            message_id: MessageId::DownloadStarted,
            show_notification: item.download_id == DIRECT_DOWNLOAD_ID,
            file_name: item.file_name.clone(),
        });
        self.repository.insert(item).await?;
        Ok(())
    }

    async fn on_success_by_id(
        &self,
        download_id: i64,
        content_length: u64,
    ) -> Result<(), DownloadError> {
        debug!(download_id, content_length, "download succeeded");
        self.pixel.fire(DownloadsPixelName::DownloadRequestSucceeded);
        self.repository
            .update_by_id(download_id, DownloadStatus::Finished, content_length)
            .await?;

        let Some(item) = self.repository.get_download_item(download_id).await? else {
            warn!(download_id, "finished download is not in the repository");
            return Err(DownloadError::NotFound(download_id));
        };

        // The download manager shows its own completion notification.
        self.channel.send(DownloadCommand::ShowDownloadSuccessMessage {
            message_id: MessageId::DownloadFinished,
            show_notification: false,
            file_name: item.file_name,
            file_path: item.file_path,
            mime_type: None,
        });
        Ok(())
    }

    async fn on_success_file(
        &self,
        file: &Path,
        mime_type: Option<&str>,
    ) -> Result<(), DownloadError> {
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(file_name = %file_name, "download succeeded");
        self.pixel.fire(DownloadsPixelName::DownloadRequestSucceeded);

        // A missing or unreadable file counts as empty.
        let content_length = tokio::fs::metadata(file)
            .await
            .map(|meta| meta.len())
            .unwrap_or(0);
        self.repository
            .update_by_file_name(&file_name, DownloadStatus::Finished, content_length)
            .await?;

        let file_path = std::path::absolute(file)
            .unwrap_or_else(|_| file.to_path_buf())
            .display()
            .to_string();
        self.channel.send(DownloadCommand::ShowDownloadSuccessMessage {
            message_id: MessageId::DownloadFinished,
            show_notification: true,
            file_name,
            file_path,
            mime_type: mime_type.map(str::to_owned),
        });
        Ok(())
    }

    async fn on_failure(
        &self,
        download_id: Option<i64>,
        url: Option<&str>,
        reason: DownloadFailReason,
    ) {
        debug!(
            download_id = ?download_id,
            url = url.unwrap_or_default(),
            reason = %reason,
            "download failed"
        );
        self.pixel.fire(DownloadsPixelName::DownloadRequestFailed);
        self.channel.send(DownloadCommand::ShowDownloadFailedMessage {
            message_id: reason.message_id(),
            show_notification: download_id == Some(DIRECT_DOWNLOAD_ID),
            show_enable_download_manager_action: reason.offers_enable_download_manager(),
        });
    }

    fn commands(&self) -> BoxStream<'static, DownloadCommand> {
        Box::pin(CommandChannel::stream(Arc::clone(&self.channel)))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use harbor_store_memory::MemoryDownloadsRepository;

    use crate::pixel::{CountingPixel, PixelSnapshot};

    use super::*;

    struct Fixture {
        repository: Arc<MemoryDownloadsRepository>,
        pixel: Arc<CountingPixel>,
        callback: FileDownloadCallback,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(MemoryDownloadsRepository::new());
        let pixel = Arc::new(CountingPixel::new());
        let callback = FileDownloadCallback::new(repository.clone(), pixel.clone());
        Fixture {
            repository,
            pixel,
            callback,
        }
    }

    #[tokio::test]
    async fn start_of_direct_download_shows_notification() {
        let f = fixture();
        f.callback
            .on_start(DownloadItem::started(0, "a.png", "/d/a.png"))
            .await
            .unwrap();

        assert_eq!(
            f.callback.channel().try_recv(),
            Some(DownloadCommand::ShowDownloadStartedMessage {
                message_id: MessageId::DownloadStarted,
                show_notification: true,
                file_name: "a.png".into(),
            })
        );
        assert_eq!(f.repository.get_downloads().await.unwrap().len(), 1);
        assert_eq!(f.pixel.snapshot().started, 1);
    }

    #[tokio::test]
    async fn start_of_managed_download_has_no_notification() {
        let f = fixture();
        f.callback
            .on_start(DownloadItem::started(17, "b.pdf", "/d/b.pdf"))
            .await
            .unwrap();

        let command = f.callback.channel().try_recv().unwrap();
        assert!(!command.show_notification());
    }

    #[tokio::test]
    async fn success_by_id_updates_repository_and_emits_without_notification() {
        let f = fixture();
        f.repository
            .insert(DownloadItem::started(5, "c.zip", "/d/c.zip"))
            .await
            .unwrap();

        f.callback.on_success_by_id(5, 1_024).await.unwrap();

        let stored = f.repository.get_download_item(5).await.unwrap().unwrap();
        assert_eq!(stored.status, DownloadStatus::Finished);
        assert_eq!(stored.content_length, 1_024);

        assert_eq!(
            f.callback.channel().try_recv(),
            Some(DownloadCommand::ShowDownloadSuccessMessage {
                message_id: MessageId::DownloadFinished,
                show_notification: false,
                file_name: "c.zip".into(),
                file_path: "/d/c.zip".into(),
                mime_type: None,
            })
        );
        assert_eq!(f.pixel.snapshot().succeeded, 1);
    }

    #[tokio::test]
    async fn success_by_unknown_id_is_not_found() {
        let f = fixture();
        let err = f.callback.on_success_by_id(404, 1).await.unwrap_err();
        assert!(matches!(err, DownloadError::NotFound(404)));
        assert!(f.callback.channel().try_recv().is_none());
    }

    #[tokio::test]
    async fn success_for_file_uses_length_on_disk() {
        let f = fixture();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        f.repository
            .insert(DownloadItem::started(0, "note.txt", path.display().to_string()))
            .await
            .unwrap();

        f.callback
            .on_success_file(&path, Some("text/plain"))
            .await
            .unwrap();

        let stored = f.repository.get_downloads().await.unwrap().remove(0);
        assert_eq!(stored.status, DownloadStatus::Finished);
        assert_eq!(stored.content_length, 5);

        match f.callback.channel().try_recv().unwrap() {
            DownloadCommand::ShowDownloadSuccessMessage {
                show_notification,
                file_name,
                mime_type,
                ..
            } => {
                assert!(show_notification);
                assert_eq!(file_name, "note.txt");
                assert_eq!(mime_type.as_deref(), Some("text/plain"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_with_disabled_manager_offers_enable_action() {
        let f = fixture();
        f.callback
            .on_failure(Some(0), None, DownloadFailReason::DownloadManagerDisabled)
            .await;

        assert_eq!(
            f.callback.channel().try_recv(),
            Some(DownloadCommand::ShowDownloadFailedMessage {
                message_id: MessageId::DownloadManagerDisabledError,
                show_notification: true,
                show_enable_download_manager_action: true,
            })
        );
        assert_eq!(f.pixel.snapshot().failed, 1);
    }

    #[tokio::test]
    async fn failure_message_per_reason() {
        let cases = [
            (DownloadFailReason::ConnectionRefused, MessageId::DownloadError),
            (DownloadFailReason::Other, MessageId::DownloadGenericError),
            (DownloadFailReason::UnsupportedUrlType, MessageId::DownloadGenericError),
            (DownloadFailReason::DataUriParseException, MessageId::DownloadGenericError),
        ];
        let f = fixture();
        for (reason, expected) in cases {
            f.callback.on_failure(Some(9), Some("https://x"), reason).await;
            match f.callback.channel().try_recv().unwrap() {
                DownloadCommand::ShowDownloadFailedMessage {
                    message_id,
                    show_notification,
                    show_enable_download_manager_action,
                } => {
                    assert_eq!(message_id, expected);
                    assert!(!show_notification);
                    assert!(!show_enable_download_manager_action);
                }
                other => panic!("unexpected command: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn failure_without_download_id_has_no_notification() {
        let f = fixture();
        f.callback
            .on_failure(None, None, DownloadFailReason::Other)
            .await;
        assert!(!f.callback.channel().try_recv().unwrap().show_notification());
    }

    #[tokio::test]
    async fn consumer_only_sees_latest_command() {
        let f = fixture();
        let mut commands = f.callback.commands();

        f.callback
            .on_start(DownloadItem::started(0, "first.png", "/d/first.png"))
            .await
            .unwrap();
        f.callback
            .on_failure(Some(0), None, DownloadFailReason::ConnectionRefused)
            .await;

        let next = commands.next().await.unwrap();
        assert_eq!(next.message_id(), MessageId::DownloadError);

        drop(f.callback);
        assert!(commands.next().await.is_none());
        assert_eq!(
            f.pixel.snapshot(),
            PixelSnapshot {
                started: 1,
                succeeded: 0,
                failed: 1,
            }
        );
    }
}
