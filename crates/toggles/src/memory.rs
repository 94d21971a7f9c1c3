use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::ToggleError;
use crate::repository::{RemoteFeatureToggle, RemoteFeatureTogglesRepository};

/// [`RemoteFeatureTogglesRepository`] over a fixed, replaceable list.
#[derive(Debug, Default)]
pub struct InMemoryRemoteFeatureTogglesRepository {
    features: RwLock<Vec<RemoteFeatureToggle>>,
}

impl InMemoryRemoteFeatureTogglesRepository {
    pub fn new(features: impl IntoIterator<Item = RemoteFeatureToggle>) -> Self {
        Self {
            features: RwLock::new(features.into_iter().collect()),
        }
    }

    /// Replace the whole list, as a fresh remote payload would.
    pub fn replace(&self, features: impl IntoIterator<Item = RemoteFeatureToggle>) {
        *self.features.write() = features.into_iter().collect();
    }

    /// Insert or replace a toggle by name.
    pub fn set(&self, feature_name: &str, is_enabled: bool) {
        let mut features = self.features.write();
        match features.iter_mut().find(|f| f.feature_name == feature_name) {
            Some(existing) => existing.is_enabled = is_enabled,
            None => features.push(RemoteFeatureToggle::new(feature_name, is_enabled)),
        }
    }
}

#[async_trait]
impl RemoteFeatureTogglesRepository for InMemoryRemoteFeatureTogglesRepository {
    async fn get_all_features(&self) -> Result<Vec<RemoteFeatureToggle>, ToggleError> {
        Ok(self.features.read().clone())
    }
}
