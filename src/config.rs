//! Configuration System
//!
//! Layered configuration: built-in defaults, then `assetgraph.toml` in the
//! working directory, then `ASSETGRAPH__*` environment variables.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::store::path::normalize_asset_path;
use crate::store::DirectoryStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::{CONFIG_FILE_NAME, ENV_PREFIX};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetGraphConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where generated files go and how their state is tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root; relative paths resolve against the working directory
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,

    /// State record path, relative to the output root
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Maintain the state record at all
    #[serde(default = "default_true")]
    pub record_state: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_state_file() -> String {
    crate::store::DEFAULT_STATE_FILE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            state_file: default_state_file(),
            record_state: default_true(),
        }
    }
}

impl OutputConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.dir.as_os_str().is_empty() {
            return Err("Output dir cannot be empty".to_string());
        }
        if self.record_state {
            if self.state_file.trim().is_empty() {
                return Err("State file cannot be empty".to_string());
            }
            normalize_asset_path(&self.state_file)
                .map_err(|e| format!("State file must stay inside the output dir: {}", e))?;
        }
        Ok(())
    }

    /// Output root, with a relative `dir` resolved against `base`.
    pub fn resolve_dir(&self, base: &Path) -> PathBuf {
        if self.dir.is_absolute() {
            self.dir.clone()
        } else {
            base.join(&self.dir)
        }
    }

    /// Open the configured store under `base`.
    pub fn open_store(&self, base: &Path) -> Result<DirectoryStore, ApiError> {
        let store = DirectoryStore::new(self.resolve_dir(base))?;
        if self.record_state {
            Ok(store.with_state_file(&self.state_file)?)
        } else {
            Ok(store.without_state())
        }
    }
}

impl AssetGraphConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        self.output
            .validate()
            .map_err(|e| ApiError::ConfigError(format!("Configuration validation failed: {}", e)))
    }
}

/// Loads [`AssetGraphConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then `<dir>/assetgraph.toml` if present, then the environment.
    pub fn load(dir: &Path) -> Result<AssetGraphConfig, ApiError> {
        Self::load_with_env(dir, None)
    }

    /// Like [`ConfigLoader::load`] with `vars` standing in for the process environment.
    pub fn load_with_env(
        dir: &Path,
        vars: Option<config::Map<String, String>>,
    ) -> Result<AssetGraphConfig, ApiError> {
        let builder = merge::builder_with_defaults()?;
        let builder = sources::add_directory_file(builder, dir)?;
        let builder = sources::add_environment(builder, vars)?;
        Self::finish(builder)
    }

    /// Defaults, then exactly one explicit file, then the environment.
    pub fn load_from_file(path: &Path) -> Result<AssetGraphConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge::builder_with_defaults()?;
        let builder = sources::add_explicit_file(builder, path)?;
        let builder = sources::add_environment(builder, None)?;
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<AssetGraphConfig, ApiError> {
        let config: AssetGraphConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
