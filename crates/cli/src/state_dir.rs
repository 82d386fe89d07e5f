//! Platform-specific state directory management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Where the CLI keeps its configuration, session and logs
pub struct StateDir {
    project_dirs: Option<ProjectDirs>,
    /// Set by `--data-dir` / `FOREIGNEYE_STATE_DIR`
    override_dir: Option<PathBuf>,
}

impl StateDir {
    pub fn new() -> Self {
        let project_dirs = ProjectDirs::from("com", "ForeignEye", "foreigneye");
        if project_dirs.is_none() {
            warn!("Failed to determine platform-specific directories, will use fallback");
        }
        Self {
            project_dirs,
            override_dir: None,
        }
    }

    pub fn with_override(path: impl Into<PathBuf>) -> Self {
        Self {
            project_dirs: None,
            override_dir: Some(path.into()),
        }
    }

    /// Use the override when given, platform directories otherwise
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        data_dir.map_or_else(Self::new, Self::with_override)
    }

    pub fn config_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("config");
        }

        self.project_dirs.as_ref().map_or_else(
            || PathBuf::from("./config"),
            |dirs| dirs.config_dir().to_path_buf(),
        )
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(override_dir) = &self.override_dir {
            return override_dir.join("data");
        }

        self.project_dirs.as_ref().map_or_else(
            || PathBuf::from("./data"),
            |dirs| dirs.data_dir().to_path_buf(),
        )
    }

    /// Optional configuration file picked up without `--config`
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join("config.toml")
    }

    /// Persisted access and refresh tokens
    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("cli.log")
    }

    /// Create the config and data directories
    pub fn create_directories(&self) -> Result<()> {
        for dir in [self.config_dir(), self.data_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            debug!("Ensured directory exists: {}", dir.display());
        }
        Ok(())
    }
}

impl Default for StateDir {
    fn default() -> Self {
        Self::new()
    }
}
