//! Analyzer configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Network and probing settings for an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Timeout for the page fetch, in seconds
    pub request_timeout_secs: u64,

    /// Timeout for each image size probe, in seconds
    pub probe_timeout_secs: u64,

    /// Maximum number of redirects to follow
    pub max_redirects: usize,

    /// Probe the sizes of this many images at most
    pub max_image_probes: usize,

    /// Images larger than this many bytes count as oversized
    pub oversized_image_bytes: u64,

    /// Whether to probe image sizes at all
    pub probe_images: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "Mozilla/5.0 (compatible; seoscope/{})",
                env!("CARGO_PKG_VERSION")
            ),
            request_timeout_secs: 30,
            probe_timeout_secs: 5,
            max_redirects: 10,
            max_image_probes: 10,
            oversized_image_bytes: 300_000,
            probe_images: true,
        }
    }
}

impl AnalyzerConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse analyzer config")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.max_image_probes, 10);
        assert_eq!(config.oversized_image_bytes, 300_000);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.user_agent.contains("seoscope/"));
        assert!(config.probe_images);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            AnalyzerConfig::from_json(r#"{"probe_timeout_secs": 2, "probe_images": false}"#)
                .unwrap();

        assert_eq!(config.probe_timeout(), Duration::from_secs(2));
        assert!(!config.probe_images);
        assert_eq!(config.max_redirects, 10);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(AnalyzerConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AnalyzerConfig::from_file("/nonexistent/seoscope.json").unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
