//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_create_summary, format_status_json, format_status_text};
use crate::config::{AssetGraphConfig, ConfigLoader};
use crate::error::ApiError;
use crate::targets::{self, Target};
use std::path::PathBuf;
use tracing::info;

/// Runtime context for CLI execution: working directory and loaded config.
pub struct RunContext {
    dir: PathBuf,
    config: AssetGraphConfig,
}

impl RunContext {
    /// Load config for `dir`, or from `config_path` when given.
    pub fn new(dir: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&dir)?,
        };
        Ok(Self::with_config(dir, config))
    }

    pub fn with_config(dir: PathBuf, config: AssetGraphConfig) -> Self {
        Self { dir, config }
    }

    pub fn config(&self) -> &AssetGraphConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Create { target } => {
                let target: Target = target.parse()?;
                let store = self.config.output.open_store(&self.dir)?;
                info!(target = %target, root = %store.root().display(), "Creating target");
                let summary = targets::create(&store, target)?;
                Ok(format_create_summary(&summary))
            }
            Commands::Graph { target } => Ok(targets::graph(target.parse()?)),
            Commands::Status { format } => {
                let store = self.config.output.open_store(&self.dir)?;
                let statuses = store.inspect_state()?;
                match format.as_str() {
                    "text" => Ok(format_status_text(&statuses)),
                    "json" => Ok(format_status_json(&statuses)),
                    other => Err(ApiError::ConfigError(format!(
                        "Invalid status format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
        }
    }
}
