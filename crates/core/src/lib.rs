pub mod command;
pub mod download;
pub mod error;
pub mod pixel;

pub use command::{DownloadCommand, DownloadFailReason, MessageId};
pub use download::{DIRECT_DOWNLOAD_ID, DownloadItem, DownloadStatus};
pub use error::HarborError;
pub use pixel::DownloadsPixelName;
