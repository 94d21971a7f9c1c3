use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Args;
use futures::StreamExt;
use tracing::warn;

use harbor_core::{DownloadCommand, DownloadFailReason, HarborError};
use harbor_datauri::DataUriParser;
use harbor_downloads::{
    DataUriDownloader, DownloadCallback, DownloadError, FileDownloadCallback, LogPixel,
};
use harbor_store_memory::MemoryDownloadsRepository;
use harbor_toggles::FeatureToggleCache;

use crate::OutputFormat;

/// Toggle that gates saving `data:` URIs; enabled unless configured off.
pub const DATA_URI_DOWNLOADS: &str = "data_uri_downloads";

#[derive(Args, Debug)]
pub struct SaveArgs {
    /// The `data:` URI to save.
    pub uri: String,

    /// Directory to write into. Overrides `downloads.directory`.
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Failed(DownloadError),
    /// The `data_uri_downloads` toggle is off.
    Disabled,
}

/// Commands the consumer received, plus how the save ended.
#[derive(Debug)]
pub struct SaveReport {
    pub commands: Vec<DownloadCommand>,
    pub outcome: SaveOutcome,
}

pub async fn save(
    parser: DataUriParser,
    toggles: &FeatureToggleCache,
    directory: &Path,
    uri: &str,
) -> anyhow::Result<SaveReport> {
    let callback = Arc::new(FileDownloadCallback::new(
        Arc::new(MemoryDownloadsRepository::new()),
        Arc::new(LogPixel),
    ));
    let consumer = tokio::spawn(callback.commands().collect::<Vec<DownloadCommand>>());

    let outcome = if toggles.is_enabled(DATA_URI_DOWNLOADS, true) {
        let downloader = DataUriDownloader::new(parser, callback.clone());
        match downloader.download(uri, directory).await {
            Ok(path) => SaveOutcome::Saved(path),
            Err(e) => SaveOutcome::Failed(e),
        }
    } else {
        warn!(toggle = DATA_URI_DOWNLOADS, "data uri downloads are disabled");
        callback
            .on_failure(None, Some(uri), DownloadFailReason::UnsupportedUrlType)
            .await;
        SaveOutcome::Disabled
    };

    // Closes the channel so the consumer drains and finishes.
    drop(callback);
    let commands = consumer.await?;
    Ok(SaveReport { commands, outcome })
}

pub async fn run(
    parser: DataUriParser,
    toggles: &FeatureToggleCache,
    directory: &Path,
    args: &SaveArgs,
    format: &OutputFormat,
) -> anyhow::Result<ExitCode> {
    let report = save(parser, toggles, directory, &args.uri).await?;

    for command in &report.commands {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(command)?),
            OutputFormat::Text => println!("{}", describe(command)),
        }
    }

    match report.outcome {
        SaveOutcome::Saved(path) => {
            if matches!(format, OutputFormat::Text) {
                println!("Saved to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        SaveOutcome::Failed(e) => Err(HarborError::from(e).into()),
        SaveOutcome::Disabled => Ok(ExitCode::FAILURE),
    }
}

fn describe(command: &DownloadCommand) -> String {
    let text = command.message_id().default_text();
    match command {
        DownloadCommand::ShowDownloadStartedMessage { file_name, .. }
        | DownloadCommand::ShowDownloadSuccessMessage { file_name, .. } => {
            format!("{text}: {file_name}")
        }
        DownloadCommand::ShowDownloadFailedMessage {
            show_enable_download_manager_action: true,
            ..
        } => format!("{text} (enable the download manager to retry)"),
        DownloadCommand::ShowDownloadFailedMessage { .. } => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use harbor_core::MessageId;
    use harbor_toggles::{InMemoryRemoteFeatureTogglesRepository, RemoteFeatureToggle};

    use super::*;

    async fn toggles(features: &[(&str, bool)]) -> FeatureToggleCache {
        let repository = InMemoryRemoteFeatureTogglesRepository::new(
            features
                .iter()
                .map(|(name, enabled)| RemoteFeatureToggle::new(*name, *enabled)),
        );
        let cache = FeatureToggleCache::new(Arc::new(repository));
        cache.update_feature_toggles().await.unwrap();
        cache
    }

    #[tokio::test]
    async fn disabled_toggle_reports_unsupported_and_writes_nothing() {
        let toggles = toggles(&[(DATA_URI_DOWNLOADS, false)]).await;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");

        let report = save(
            DataUriParser::default(),
            &toggles,
            &target,
            "data:text/plain,hello",
        )
        .await
        .unwrap();

        assert!(matches!(report.outcome, SaveOutcome::Disabled));
        assert_eq!(
            report.commands,
            vec![DownloadCommand::ShowDownloadFailedMessage {
                message_id: DownloadFailReason::UnsupportedUrlType.message_id(),
                show_notification: false,
                show_enable_download_manager_action: false,
            }]
        );
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn toggle_defaults_to_enabled() {
        let toggles = toggles(&[]).await;
        let dir = tempfile::tempdir().unwrap();

        let report = save(
            DataUriParser::default(),
            &toggles,
            dir.path(),
            "data:text/plain,hello",
        )
        .await
        .unwrap();

        let SaveOutcome::Saved(path) = report.outcome else {
            panic!("expected a saved file, got {:?}", report.outcome);
        };
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"hello");
        let last = report.commands.last().unwrap();
        assert_eq!(last.message_id(), MessageId::DownloadFinished);
    }

    #[tokio::test]
    async fn invalid_uri_is_a_failed_save() {
        let toggles = toggles(&[(DATA_URI_DOWNLOADS, true)]).await;
        let dir = tempfile::tempdir().unwrap();

        let report = save(DataUriParser::default(), &toggles, dir.path(), "nope")
            .await
            .unwrap();

        assert!(matches!(
            report.outcome,
            SaveOutcome::Failed(DownloadError::InvalidDataUri)
        ));
        assert_eq!(report.commands.len(), 1);
        assert_eq!(report.commands[0].message_id(), MessageId::DownloadGenericError);
    }

    #[test]
    fn describes_each_command_kind() {
        let started = DownloadCommand::ShowDownloadStartedMessage {
            message_id: MessageId::DownloadStarted,
            show_notification: true,
            file_name: "a.png".into(),
        };
        assert_eq!(describe(&started), "Download started: a.png");

        let failed = DownloadCommand::ShowDownloadFailedMessage {
            message_id: MessageId::DownloadManagerDisabledError,
            show_notification: true,
            show_enable_download_manager_action: true,
        };
        assert!(describe(&failed).ends_with("(enable the download manager to retry)"));
    }
}
