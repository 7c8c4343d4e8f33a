//! Configuration file parsing for .triage.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::correlate::DEFAULT_DISTANCE_THRESHOLD;

/// Main configuration structure for .triage.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub correlate: CorrelateConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Threshold for non-zero exit: "issues", "failures", or "never"
    #[serde(default = "default_fail_on")]
    pub fail_on: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelateConfig {
    /// Max line distance between a crash frame and an issue
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: usize,

    /// Lookup URL for matched backtraces; `{hash}` is substituted
    #[serde(default = "default_url_template")]
    pub url_template: String,

    /// Crash-report collection: a local JSON file or an http(s) URL.
    /// Correlation only runs when a source is configured here or given on
    /// the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Paths to skip when walking the results directory
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "html", "terminal", or "json"
    #[serde(default = "default_format")]
    pub format: String,

    /// Directory the HTML report is written to
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Enable color output
    #[serde(default = "default_true")]
    pub color: bool,
}

// Default functions
fn default_fail_on() -> String {
    "never".to_string()
}

fn default_distance_threshold() -> usize {
    DEFAULT_DISTANCE_THRESHOLD
}

fn default_url_template() -> String {
    "https://retrace.fedoraproject.org/faf/reports/bthash/{hash}/".to_string()
}

fn default_format() -> String {
    "html".to_string()
}

fn default_output_dir() -> String {
    "triage-report".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TriageConfig {
    fn default() -> Self {
        toml::from_str("").expect("empty TOML should parse to defaults")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fail_on: default_fail_on(),
        }
    }
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            url_template: default_url_template(),
            source: None,
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self { paths: Vec::new() }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            dir: default_output_dir(),
            color: true,
        }
    }
}

impl TriageConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TriageConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Find and load .triage.toml from the given directory or ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(".triage.toml");
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // No config found, use defaults
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
