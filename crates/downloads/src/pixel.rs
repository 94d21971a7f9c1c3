use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use harbor_core::DownloadsPixelName;

/// Sink for named counter events.
pub trait Pixel: Send + Sync {
    fn fire(&self, pixel: DownloadsPixelName);
}

/// A pixel sink that only logs each event.
#[derive(Debug, Default)]
pub struct LogPixel;

impl Pixel for LogPixel {
    fn fire(&self, pixel: DownloadsPixelName) {
        info!(pixel = %pixel, "pixel fired");
    }
}

/// Atomic counters for download pixels.
///
/// All counters use relaxed ordering. For a consistent point-in-time view,
/// call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct CountingPixel {
    pub started: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
}

/// Point-in-time copy of [`CountingPixel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelSnapshot {
    pub started: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl CountingPixel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PixelSnapshot {
        PixelSnapshot {
            started: self.started.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl Pixel for CountingPixel {
    fn fire(&self, pixel: DownloadsPixelName) {
        let counter = match pixel {
            DownloadsPixelName::DownloadRequestStarted => &self.started,
            DownloadsPixelName::DownloadRequestSucceeded => &self.succeeded,
            DownloadsPixelName::DownloadRequestFailed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
