//! CLI configuration
//!
//! Sources, lowest precedence first: built-in defaults, a TOML/YAML file
//! (`--config`, or `config.toml` in the config directory when present), and
//! `FOREIGNEYE_*` environment variables such as `FOREIGNEYE_API__BASE_URL`.

use crate::state_dir::StateDir;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use foreigneye_client::ClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API connection settings
    pub api: ClientConfig,

    /// Session file location (defaults to the data directory)
    pub session_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings for this invocation
    pub fn load(explicit: Option<&Path>, state_dir: &StateDir) -> Result<Self> {
        let defaults = ClientConfig::default();

        let mut builder = Config::builder()
            .set_default("api.base_url", defaults.base_url)?
            .set_default("api.timeout_secs", defaults.timeout_secs)?;

        builder = match explicit {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder.add_source(File::from(path))
            }
            None => builder.add_source(File::from(state_dir.config_path()).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("FOREIGNEYE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn session_path(&self, state_dir: &StateDir) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| state_dir.session_path())
    }
}
