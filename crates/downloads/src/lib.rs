//! Download lifecycle reporting for Harbor.
//!
//! [`FileDownloadCallback`] turns start/success/failure events into
//! [`DownloadCommand`](harbor_core::DownloadCommand)s for the UI. Commands
//! pass through a [`CommandChannel`] that keeps only the latest unconsumed
//! command, so producers never wait on a slow UI.

pub mod callback;
pub mod channel;
pub mod datauri;
pub mod error;
pub mod pixel;

pub use callback::{DownloadCallback, FileDownloadCallback};
pub use channel::CommandChannel;
pub use datauri::DataUriDownloader;
pub use error::DownloadError;
pub use pixel::{CountingPixel, LogPixel, Pixel, PixelSnapshot};
