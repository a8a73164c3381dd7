//! Config sources: the directory config file and `ASSETGRAPH__*` env vars.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, Map};
use std::path::Path;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "assetgraph.toml";
pub const ENV_PREFIX: &str = "ASSETGRAPH";
pub const ENV_SEPARATOR: &str = "__";

/// Add `<dir>/assetgraph.toml` to the builder if it exists.
pub fn add_directory_file(
    builder: ConfigBuilder<DefaultState>,
    dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(builder);
    }
    debug!(config_path = %path.display(), "Using directory config file");
    Ok(builder.add_source(File::from(path.as_path()).required(false)))
}

/// Add an explicit config file; it must exist.
pub fn add_explicit_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(File::from(path).required(true)))
}

/// Add environment overrides, e.g. `ASSETGRAPH__OUTPUT__STATE_FILE`.
///
/// `vars` replaces the process environment when given.
pub fn add_environment(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(vars),
    ))
}
