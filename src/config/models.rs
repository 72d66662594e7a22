use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::normalize::DEFAULT_EXCLUDED_TOKENS;

const DEFAULT_LOG_LEVEL: &str = "info";

#[inline]
fn default_excluded_tokens() -> Vec<String> {
    DEFAULT_EXCLUDED_TOKENS.iter().map(|t| t.to_string()).collect()
}

#[inline]
fn default_normalize_on_remove() -> bool {
    true
}

#[inline]
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Provisioning and logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Tokens stripped from every path before normalization
    #[serde(default = "default_excluded_tokens")]
    pub excluded_tokens: Vec<String>,

    /// Normalize paths passed to remove (false keeps the raw-path behavior)
    #[serde(default = "default_normalize_on_remove")]
    pub normalize_on_remove: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional log file directory (if None, only console logging)
    #[serde(default)]
    pub log_directory: Option<PathBuf>,

    /// Log file rotation strategy
    #[serde(default)]
    pub log_rotation: LogRotation,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            excluded_tokens: default_excluded_tokens(),
            normalize_on_remove: default_normalize_on_remove(),
            log_level: default_log_level(),
            log_directory: None,
            log_rotation: LogRotation::default(),
        }
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> Result<ProvisionConfig> {
    if !path.exists() {
        bail!("Configuration file not found: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: ProvisionConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    debug!(
        "Loaded configuration from {} ({} excluded tokens)",
        path.display(),
        config.excluded_tokens.len()
    );
    Ok(config)
}

/// Log file rotation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate daily
    #[default]
    Daily,
    /// Rotate hourly
    Hourly,
    /// Never rotate (single file)
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_empty_document() {
        let config: ProvisionConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config, ProvisionConfig::default());
        assert_eq!(config.excluded_tokens, vec!["*", "?", "\"", "<", ">", "|"]);
        assert!(config.normalize_on_remove);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_rotation, LogRotation::Daily);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fsprov.json");
        std::fs::write(
            &path,
            r##"{
  "excluded_tokens": ["#"],
  "normalize_on_remove": false,
  "log_level": "debug",
  "log_directory": "./logs",
  "log_rotation": { "type": "hourly" }
}"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.excluded_tokens, vec!["#"]);
        assert!(!config.normalize_on_remove);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_directory, Some(PathBuf::from("./logs")));
        assert_eq!(config.log_rotation, LogRotation::Hourly);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();

        let err = load_config(&dir.path().join("nope.json")).unwrap_err();

        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ \"log_level\": 3 }").unwrap();

        let err = load_config(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
