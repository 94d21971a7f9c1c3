use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::ToggleError;
use crate::repository::RemoteFeatureTogglesRepository;

/// In-memory view of remote feature toggles.
///
/// Reads never touch the repository; call
/// [`update_feature_toggles`](Self::update_feature_toggles) to refresh.
/// Toggles missing from a refresh keep their previous value.
pub struct FeatureToggleCache {
    repository: Arc<dyn RemoteFeatureTogglesRepository>,
    features: RwLock<HashMap<String, bool>>,
}

impl FeatureToggleCache {
    pub fn new(repository: Arc<dyn RemoteFeatureTogglesRepository>) -> Self {
        Self {
            repository,
            features: RwLock::new(HashMap::new()),
        }
    }

    /// Pull every toggle from the repository into the cache.
    ///
    /// Returns the number of toggles received.
    pub async fn update_feature_toggles(&self) -> Result<usize, ToggleError> {
        let toggles = self.repository.get_all_features().await?;
        let count = toggles.len();

        let mut features = self.features.write();
        for toggle in toggles {
            debug!(
                feature = %toggle.feature_name,
                enabled = toggle.is_enabled,
                "feature toggle updated"
            );
            features.insert(toggle.feature_name, toggle.is_enabled);
        }
        Ok(count)
    }

    /// The cached value for `feature_name`, or `None` if it was never seen.
    pub fn get(&self, feature_name: &str) -> Option<bool> {
        self.features.read().get(feature_name).copied()
    }

    /// The cached value for `feature_name`, or `default` if it was never seen.
    pub fn is_enabled(&self, feature_name: &str, default: bool) -> bool {
        self.get(feature_name).unwrap_or(default)
    }
}
