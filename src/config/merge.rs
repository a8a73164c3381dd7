//! Merge rules: built-in defaults applied before any file or env source.

use crate::store::DEFAULT_STATE_FILE;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("output.dir", ".")?
        .set_default("output.state_file", DEFAULT_STATE_FILE)?
        .set_default("output.record_state", true)
}
