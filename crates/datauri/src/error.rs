use thiserror::Error;

/// Errors that can occur while working with a parsed data URI.
#[derive(Debug, Error)]
pub enum DataUriError {
    /// The payload is not valid for its declared encoding.
    #[error("failed to decode payload: {0}")]
    Decode(String),
}
