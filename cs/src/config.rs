//! Configuration for contentstore
//!
//! Loaded with a fallback chain: explicit `--config` path, then
//! `./contentstore.yml`, then `~/.config/contentstore/config.yml`, then
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

/// Prefix marking a builtin catalog in `content.sources`
pub const BUILTIN_PREFIX: &str = "builtin:";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where content is read from
    pub content: ContentConfig,

    /// Load-time validation behavior
    pub validation: ValidationConfig,

    /// Query display settings
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: contentstore.yml
        let local_config = PathBuf::from("contentstore.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/contentstore/config.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("contentstore").join("config.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// A parsed entry of `content.sources`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Embedded catalog by name
    Builtin(String),
    /// File or directory on disk
    Path(PathBuf),
    /// Glob pattern over files
    Pattern(String),
}

/// Content source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Sources loaded in order: `builtin:<name>`, a directory, a file, or a glob pattern
    pub sources: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                "builtin:oncology".to_string(),
                "builtin:cancer-screening".to_string(),
                "builtin:ear-disorders".to_string(),
                "~/.config/contentstore/content".to_string(),
                ".contentstore/content".to_string(),
            ],
        }
    }
}

impl ContentConfig {
    /// Config that loads exactly the given sources
    pub fn with_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// Expand sources (resolve builtin names, ~/ and glob patterns)
    pub fn source_specs(&self) -> Vec<SourceSpec> {
        self.sources
            .iter()
            .filter_map(|s| {
                if let Some(name) = s.strip_prefix(BUILTIN_PREFIX) {
                    return Some(SourceSpec::Builtin(name.to_string()));
                }
                let expanded = if let Some(rest) = s.strip_prefix("~/") {
                    dirs::home_dir()?.join(rest).to_string_lossy().to_string()
                } else {
                    s.clone()
                };
                if expanded.contains(['*', '?', '[']) {
                    Some(SourceSpec::Pattern(expanded))
                } else {
                    Some(SourceSpec::Path(PathBuf::from(expanded)))
                }
            })
            .collect()
    }
}

/// Validation settings applied when content is loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat any warning as a load failure
    #[serde(rename = "warnings-as-errors")]
    pub warnings_as_errors: bool,

    /// Report cross-references whose target id is not in the store
    #[serde(rename = "check-cross-references")]
    pub check_cross_references: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            warnings_as_errors: false,
            check_cross_references: true,
        }
    }
}

/// Search display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum results printed by the CLI
    #[serde(rename = "max-results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_results: 20 }
    }
}
