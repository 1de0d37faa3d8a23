use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use factgraph_core::graph::DEFAULT_RELATED_LIMIT;

const APP_NAME: &str = "factgraph";
const CONFIG_FILE: &str = "config.json";
const DATA_ENV: &str = "FACTGRAPH_DATA";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Content documents, merged in order
    pub data: Vec<PathBuf>,
    /// Refuse to start when the content set has dangling references
    pub strict: bool,
    /// Default number of related items for the CLI
    pub related_limit: usize,
    /// Port for `serve`
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            strict: false,
            related_limit: DEFAULT_RELATED_LIMIT,
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Load configuration from the user's config directory, then apply
    /// `FACTGRAPH_DATA`. Falls back to defaults if the file is missing or broken.
    pub fn load() -> Self {
        let mut config = match get_config_path().and_then(|p| Self::load_from(&p)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        if let Ok(data) = std::env::var(DATA_ENV) {
            config.data = std::env::split_paths(&data).collect();
        }
        config
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Content files to load: explicit paths win over configured ones.
    pub fn data_sources(&self, explicit: Vec<PathBuf>) -> Vec<PathBuf> {
        if explicit.is_empty() {
            self.data.clone()
        } else {
            explicit
        }
    }
}

fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
