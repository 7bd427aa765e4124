use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy_utils::tracing::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG_PATH;
use crate::error::ConfigError;
use crate::rules::budget::{GraspCap, DEFAULT_GRASP_CAP};
use crate::rules::awakening::DEFAULT_MAX_AWAKENING_PASSES;

pub const DEFAULT_CONFIG_PATH: &str = "./assets/data/engine.json";

/// Engine settings shared by every build session in a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grasp_cap: u32,
    pub max_awakening_passes: usize,
    pub catalog_path: PathBuf,
    /// Read the catalog from this SQLite database instead of `catalog_path`.
    pub catalog_db: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grasp_cap: DEFAULT_GRASP_CAP,
            max_awakening_passes: DEFAULT_MAX_AWAKENING_PASSES,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            catalog_db: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grasp_cap()?;
        if self.max_awakening_passes == 0 {
            return Err(ConfigError::NoAwakeningPasses);
        }
        Ok(())
    }

    pub fn grasp_cap(&self) -> Result<GraspCap, ConfigError> {
        GraspCap::try_from(self.grasp_cap)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`EngineConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path.as_ref()) {
            Err(ConfigError::Io { source, path }) if source.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "engine config not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }
}
