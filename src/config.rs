//! Configuration loading.
//!
//! Settings come from a YAML file, looked up in order: an explicit
//! `--config` path, `./taskdeck.yaml`, then the platform config directory.
//! A missing file yields the defaults; a malformed file is an error.

use crate::types::SortOrder;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Override for the persisted document location.
    pub storage_path: Option<PathBuf>,

    /// Sort order applied when a listing does not request one.
    pub default_sort: Option<SortOrder>,
}

impl Config {
    /// Load configuration, preferring the explicit path when given.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::search_path(),
        };

        match path {
            Some(path) => {
                let yaml = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let config: Config = serde_yaml::from_str(&yaml)
                    .with_context(|| format!("{} is not a valid config", path.display()))?;
                debug!(path = %path.display(), "Loaded config");
                Ok(config)
            }
            None => Ok(Config::default()),
        }
    }

    fn search_path() -> Option<PathBuf> {
        let local = PathBuf::from("taskdeck.yaml");
        if local.exists() {
            return Some(local);
        }
        let global = dirs::config_dir()?.join("taskdeck").join("config.yaml");
        global.exists().then_some(global)
    }
}
