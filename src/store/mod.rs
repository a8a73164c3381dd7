//! File Store
//!
//! Read and write access to the output root that assets are persisted under.
//! Reload goes through [`FileFetcher`]; writes go through [`DirectoryStore`].

pub mod directory;
pub mod path;
pub mod state;

pub use directory::DirectoryStore;
pub use state::{FileRecord, FileState, FileStatus, PersistedState, DEFAULT_STATE_FILE};

use crate::asset::AssetFile;
use crate::error::StoreError;

/// Read side of the file store, handed to [`crate::asset::Asset::load`].
///
/// Paths are relative to the output root and use `/` separators.
pub trait FileFetcher {
    /// Fetch one file. `Ok(None)` when nothing exists at `path`.
    fn fetch(&self, path: &str) -> Result<Option<AssetFile>, StoreError>;

    /// Fetch every regular file below `dir`, sorted by path.
    /// Empty when the directory does not exist.
    fn fetch_dir(&self, dir: &str) -> Result<Vec<AssetFile>, StoreError>;
}
