use thiserror::Error;

use harbor_core::HarborError;

/// Errors from a feature toggle repository.
#[derive(Debug, Error)]
pub enum ToggleError {
    /// The toggle source could not be reached.
    #[error("toggle source unavailable: {0}")]
    Unavailable(String),
}

impl From<ToggleError> for HarborError {
    fn from(err: ToggleError) -> Self {
        Self::Toggle(err.to_string())
    }
}
