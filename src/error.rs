//! Error types for the asset graph.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// File store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid asset path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Storage I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid state file {path:?}: {reason}")]
    InvalidState { path: PathBuf, reason: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Resolution errors. Every variant is fatal to the session.
///
/// Causes are held behind `Arc` so a failed cache entry can hand the exact
/// same error to every later request for that asset.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The declared dependencies loop back on themselves. `cycle` starts and
    /// ends with the asset that was reached twice.
    #[error("dependency cycle detected: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    #[error("failed to fetch dependency {dependency:?} of {asset:?}")]
    Dependency {
        asset: String,
        dependency: String,
        source: Arc<ResolveError>,
    },

    #[error("failed to load asset {asset:?} from persisted state: {cause:#}")]
    ReloadParse {
        asset: String,
        cause: Arc<anyhow::Error>,
    },

    #[error("failed to generate asset {asset:?}: {cause:#}")]
    Generate {
        asset: String,
        cause: Arc<anyhow::Error>,
    },

    #[error("asset {asset:?} read {dependency:?}, which it does not declare as a dependency")]
    UndeclaredDependency { asset: String, dependency: String },

    #[error("asset {key:?} resolved to a different type than requested")]
    TypeMismatch { key: String },
}

impl ResolveError {
    /// Asset names from the requested target down to the asset that failed.
    pub fn chain(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut current = self;
        loop {
            match current {
                ResolveError::Dependency { asset, source, .. } => {
                    names.push(asset.as_str());
                    current = &**source;
                }
                ResolveError::Cycle { cycle } => {
                    // The asset that walked back into the cycle sits just before the repeat.
                    if cycle.len() >= 2 {
                        names.push(cycle[cycle.len() - 2].as_str());
                    }
                    return names;
                }
                ResolveError::ReloadParse { asset, .. }
                | ResolveError::Generate { asset, .. }
                | ResolveError::UndeclaredDependency { asset, .. } => {
                    names.push(asset.as_str());
                    return names;
                }
                ResolveError::TypeMismatch { key } => {
                    names.push(key.as_str());
                    return names;
                }
            }
        }
    }

    /// The innermost error, with all dependency wrapping removed.
    pub fn root_cause(&self) -> &ResolveError {
        let mut current = self;
        while let ResolveError::Dependency { source, .. } = current {
            current = &**source;
        }
        current
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self.root_cause(), ResolveError::Cycle { .. })
    }

    /// One-line message with every cause in the chain, outermost first.
    pub fn report(&self) -> String {
        format!("{:#}", anyhow::Error::new(self.clone()))
    }
}

/// Top-level errors surfaced by targets, configuration and the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown target: {0} (expected one of: {1})")]
    UnknownTarget(String, String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
