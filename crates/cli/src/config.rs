use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use harbor_core::HarborError;

/// Top-level configuration for the Harbor CLI, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct HarborConfig {
    /// Where saved files go.
    #[serde(default)]
    pub downloads: DownloadsConfig,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default)]
    pub log: LogConfig,
    /// Extra `mime type -> file suffix` entries layered over the built-in table.
    ///
    /// ```toml
    /// [suffixes]
    /// "text/csv" = "csv"
    /// "application/x-harbor" = "hbr"
    /// ```
    #[serde(default)]
    pub suffixes: HashMap<String, String>,
    /// Local values for remote feature toggles.
    #[serde(default)]
    pub features: HashMap<String, bool>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadsConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("downloads")
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// An `EnvFilter` directive string, e.g. `"harbor_downloads=debug,info"`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_owned()
}

impl HarborConfig {
    /// Read `path`, or fall back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, HarborError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HarborError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, HarborError> {
        toml::from_str(contents)
            .map_err(|e| HarborError::Configuration(format!("failed to parse config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = HarborConfig::parse("").unwrap();
        assert_eq!(config.downloads.directory, PathBuf::from("downloads"));
        assert_eq!(config.log.filter, "info");
        assert!(config.suffixes.is_empty());
        assert!(config.features.is_empty());
    }

    #[test]
    fn full_config() {
        let toml = r#"
            [downloads]
            directory = "/tmp/harbor"

            [log]
            filter = "harbor_downloads=debug"

            [suffixes]
            "text/csv" = "csv"

            [features]
            data_uri_downloads = false
        "#;
        let config = HarborConfig::parse(toml).unwrap();
        assert_eq!(config.downloads.directory, PathBuf::from("/tmp/harbor"));
        assert_eq!(config.log.filter, "harbor_downloads=debug");
        assert_eq!(config.suffixes.get("text/csv").map(String::as_str), Some("csv"));
        assert_eq!(config.features.get("data_uri_downloads"), Some(&false));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = HarborConfig::load(Path::new("/nonexistent/harbor.toml")).unwrap();
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn malformed_config_is_a_configuration_error() {
        let err = HarborConfig::parse("[downloads]\ndirectory = 3").unwrap_err();
        assert!(matches!(err, HarborError::Configuration(_)));
    }
}
