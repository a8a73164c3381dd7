//! Persisted state record
//!
//! Tracks which files each asset wrote and their BLAKE3 content hashes, so a
//! later run can tell untouched output from files a user tailored by hand.

use crate::asset::AssetFile;
use crate::error::StoreError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default file name of the state record, relative to the output root.
pub const DEFAULT_STATE_FILE: &str = ".assetgraph_state.json";

/// A file written by an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub hash: String,
}

/// Record of every asset persisted to an output root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Asset key -> files, both sorted for stable output.
    #[serde(default)]
    pub assets: BTreeMap<String, Vec<FileRecord>>,
}

impl PersistedState {
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            updated_at: None,
            assets: BTreeMap::new(),
        }
    }

    /// Load the record at `path`.
    ///
    /// A missing file is an empty record. A file that exists but does not
    /// decode is an error: the record is never silently reset.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let state: PersistedState =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::InvalidState {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if state.version != Self::VERSION {
            return Err(StoreError::InvalidState {
                path: path.to_path_buf(),
                reason: format!(
                    "unsupported version {} (expected {})",
                    state.version,
                    Self::VERSION
                ),
            });
        }

        Ok(state)
    }

    /// Serialize the record. Written atomically by the caller.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|e| StoreError::InvalidState {
            path: DEFAULT_STATE_FILE.into(),
            reason: e.to_string(),
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Replace the files recorded for `key`.
    pub fn record(&mut self, key: &str, files: &[AssetFile]) {
        let mut records: Vec<FileRecord> = files
            .iter()
            .map(|file| FileRecord {
                path: file.path().to_string(),
                hash: content_hash(file.data()),
            })
            .collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        self.assets.insert(key.to_string(), records);
        self.updated_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    }

    pub fn files_for(&self, key: &str) -> Option<&[FileRecord]> {
        self.assets.get(key).map(Vec::as_slice)
    }
}

/// Hex-encoded BLAKE3 hash of file content.
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(blake3::hash(data).as_bytes())
}

/// How a recorded file compares with what is on disk now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Unchanged,
    Modified,
    Missing,
}

impl FileState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileState::Unchanged => "unchanged",
            FileState::Modified => "modified",
            FileState::Missing => "missing",
        }
    }
}

/// Status of one recorded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub asset: String,
    pub path: String,
    pub state: FileState,
}
