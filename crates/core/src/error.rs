use thiserror::Error;

/// Top-level error type for the Harbor downloads layer.
#[derive(Debug, Error)]
pub enum HarborError {
    #[error("data uri error: {0}")]
    DataUri(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("download error: {0}")]
    Download(String),

    #[error("feature toggle error: {0}")]
    Toggle(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}
