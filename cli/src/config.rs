use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG: &str = "guide.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuideConfig {
    pub source: SourceConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Directory documents are read from.
    pub root: PathBuf,
    /// When set, documents are fetched over HTTP below this URL instead.
    pub base_url: Option<String>,
    /// Location of the guide the views read by default.
    pub overview: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            root: PathBuf::from("."),
            base_url: None,
            overview: "content/sections/overview.json".to_string(),
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply `--root` and `--base-url`. A root given on the command line
    /// wins over a base URL coming from the file.
    pub fn override_with(&mut self, root: Option<PathBuf>, base_url: Option<String>) {
        if let Some(root) = root {
            self.root = root;
            self.base_url = None;
        }
        if base_url.is_some() {
            self.base_url = base_url;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `guideview=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "warn".to_string(),
        }
    }
}

impl GuideConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit`, or `guide.toml` when present, or the defaults.
    /// An explicit file that cannot be read is an error. A relative root is
    /// taken relative to the directory of the file.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG);
                if !default.is_file() {
                    return Ok(GuideConfig::default());
                }
                default
            }
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut config = Self::parse(&text, &path)?;
        if let Some(dir) = path.parent() {
            if config.source.root.is_relative() {
                config.source.root = dir.join(&config.source.root);
            }
        }
        Ok(config)
    }
}
