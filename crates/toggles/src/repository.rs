use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToggleError;

/// A single remotely configured feature flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFeatureToggle {
    pub feature_name: String,
    pub is_enabled: bool,
}

impl RemoteFeatureToggle {
    pub fn new(feature_name: impl Into<String>, is_enabled: bool) -> Self {
        Self {
            feature_name: feature_name.into(),
            is_enabled,
        }
    }
}

/// Source of remote feature toggles.
#[async_trait]
pub trait RemoteFeatureTogglesRepository: Send + Sync {
    /// Every toggle currently known to the source.
    async fn get_all_features(&self) -> Result<Vec<RemoteFeatureToggle>, ToggleError>;
}
