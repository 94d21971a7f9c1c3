use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the user-facing message a UI should show for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageId {
    DownloadStarted,
    DownloadFinished,
    /// The connection to the download origin failed.
    DownloadError,
    /// The system download manager is turned off.
    DownloadManagerDisabledError,
    DownloadGenericError,
}

impl MessageId {
    /// Default English text for the message.
    #[must_use]
    pub fn default_text(self) -> &'static str {
        match self {
            Self::DownloadStarted => "Download started",
            Self::DownloadFinished => "Download complete",
            Self::DownloadError => "Download failed: check your connection and try again",
            Self::DownloadManagerDisabledError => {
                "Download failed: the download manager is disabled"
            }
            Self::DownloadGenericError => "Download failed",
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_text())
    }
}

/// Why a download could not be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadFailReason {
    ConnectionRefused,
    DownloadManagerDisabled,
    Other,
    UnsupportedUrlType,
    DataUriParseException,
}

impl DownloadFailReason {
    /// Message to show the user for this failure.
    #[must_use]
    pub fn message_id(self) -> MessageId {
        match self {
            Self::ConnectionRefused => MessageId::DownloadError,
            Self::DownloadManagerDisabled => MessageId::DownloadManagerDisabledError,
            Self::Other | Self::UnsupportedUrlType | Self::DataUriParseException => {
                MessageId::DownloadGenericError
            }
        }
    }

    /// Whether the failure can be fixed by turning the download manager on.
    #[must_use]
    pub fn offers_enable_download_manager(self) -> bool {
        self == Self::DownloadManagerDisabled
    }
}

impl fmt::Display for DownloadFailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ConnectionRefused => "connection_refused",
            Self::DownloadManagerDisabled => "download_manager_disabled",
            Self::Other => "other",
            Self::UnsupportedUrlType => "unsupported_url_type",
            Self::DataUriParseException => "data_uri_parse_exception",
        };
        f.write_str(s)
    }
}

/// A user-facing effect produced by a download lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadCommand {
    ShowDownloadStartedMessage {
        message_id: MessageId,
        show_notification: bool,
        file_name: String,
    },
    ShowDownloadSuccessMessage {
        message_id: MessageId,
        show_notification: bool,
        file_name: String,
        file_path: String,
        mime_type: Option<String>,
    },
    ShowDownloadFailedMessage {
        message_id: MessageId,
        show_notification: bool,
        show_enable_download_manager_action: bool,
    },
}

impl DownloadCommand {
    #[must_use]
    pub fn message_id(&self) -> MessageId {
        match self {
            Self::ShowDownloadStartedMessage { message_id, .. }
            | Self::ShowDownloadSuccessMessage { message_id, .. }
            | Self::ShowDownloadFailedMessage { message_id, .. } => *message_id,
        }
    }

    /// Whether a system notification should accompany the message.
    #[must_use]
    pub fn show_notification(&self) -> bool {
        match self {
            Self::ShowDownloadStartedMessage {
                show_notification, ..
            }
            | Self::ShowDownloadSuccessMessage {
                show_notification, ..
            }
            | Self::ShowDownloadFailedMessage {
                show_notification, ..
            } => *show_notification,
        }
    }
}
