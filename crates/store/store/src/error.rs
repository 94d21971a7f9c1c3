use thiserror::Error;

/// Errors from downloads repository operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected or failed the operation.
    #[error("backend error: {0}")]
    Backend(String),
}
