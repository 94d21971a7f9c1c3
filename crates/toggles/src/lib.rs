//! Remote feature toggles, fetched from a repository and cached in memory.

pub mod cache;
pub mod error;
pub mod memory;
pub mod repository;

pub use cache::FeatureToggleCache;
pub use error::ToggleError;
pub use memory::InMemoryRemoteFeatureTogglesRepository;
pub use repository::{RemoteFeatureToggle, RemoteFeatureTogglesRepository};
