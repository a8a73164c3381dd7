//! Directory-backed file store

use crate::asset::{Asset, AssetFile};
use crate::error::StoreError;
use crate::store::path::{from_fs_path, normalize_asset_path, to_fs_path};
use crate::store::state::{content_hash, FileState, FileStatus, PersistedState, DEFAULT_STATE_FILE};
use crate::store::FileFetcher;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const TEMP_SUFFIX: &str = ".assetgraph-tmp";

/// File store rooted at one output directory.
///
/// Writes go to a hidden `.<name>.assetgraph-tmp` sibling first and are
/// renamed into place, so a crash never leaves a half-written file where
/// reload would read it.
pub struct DirectoryStore {
    root: PathBuf,
    state_file: Option<String>,
}

impl DirectoryStore {
    /// Open a store at `root`, creating the directory if needed.
    ///
    /// The state record is kept at [`DEFAULT_STATE_FILE`].
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| StoreError::io(root, e))?;
        let root = dunce::canonicalize(root).map_err(|e| StoreError::io(root, e))?;

        Ok(Self {
            root,
            state_file: Some(DEFAULT_STATE_FILE.to_string()),
        })
    }

    /// Keep the state record at a different relative path.
    pub fn with_state_file(mut self, state_file: &str) -> Result<Self, StoreError> {
        self.state_file = Some(normalize_asset_path(state_file)?);
        Ok(self)
    }

    /// Do not maintain a state record at all.
    pub fn without_state(mut self) -> Self {
        self.state_file = None;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> Option<PathBuf> {
        self.state_file
            .as_deref()
            .map(|name| to_fs_path(&self.root, name))
    }

    /// Write one file atomically.
    pub fn write(&self, file: &AssetFile) -> Result<(), StoreError> {
        self.write_bytes(file.path(), file.data())
    }

    fn write_bytes(&self, asset_path: &str, data: &[u8]) -> Result<(), StoreError> {
        let target = to_fs_path(&self.root, asset_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let temp = temp_path(&target);

        fs::write(&temp, data).map_err(|e| StoreError::io(&temp, e))?;
        fs::rename(&temp, &target).map_err(|e| {
            let _ = fs::remove_file(&temp);
            StoreError::io(&target, e)
        })?;

        debug!(path = asset_path, bytes = data.len(), "Wrote asset file");
        Ok(())
    }

    /// Write every file of `asset` and record them under `key`.
    ///
    /// Returns the written paths in output order.
    pub fn persist(&self, key: &str, asset: &dyn Asset) -> Result<Vec<String>, StoreError> {
        let files = asset.files();
        for file in files {
            self.write(file)?;
        }

        if let Some(state_path) = self.state_path() {
            let mut state = PersistedState::load(&state_path)?;
            state.record(key, files);
            let rel = self.state_file.as_deref().unwrap_or(DEFAULT_STATE_FILE);
            self.write_bytes(rel, &state.to_bytes()?)?;
        }

        Ok(files.iter().map(|f| f.path().to_string()).collect())
    }

    /// Load the state record, or an empty one when state is disabled.
    pub fn load_state(&self) -> Result<PersistedState, StoreError> {
        match self.state_path() {
            Some(path) => PersistedState::load(&path),
            None => Ok(PersistedState::new()),
        }
    }

    /// Compare every recorded file with what is on disk now.
    pub fn inspect_state(&self) -> Result<Vec<FileStatus>, StoreError> {
        let state = self.load_state()?;
        let mut statuses = Vec::new();

        for (asset, records) in &state.assets {
            for record in records {
                let file_state = match self.fetch(&record.path)? {
                    None => FileState::Missing,
                    Some(file) if content_hash(file.data()) == record.hash => FileState::Unchanged,
                    Some(_) => {
                        warn!(
                            asset = %asset,
                            path = %record.path,
                            "File changed on disk since it was generated"
                        );
                        FileState::Modified
                    }
                };
                statuses.push(FileStatus {
                    asset: asset.clone(),
                    path: record.path.clone(),
                    state: file_state,
                });
            }
        }

        Ok(statuses)
    }

    fn is_internal(&self, asset_path: &str) -> bool {
        let name = asset_path.rsplit('/').next().unwrap_or(asset_path);
        let leftover_temp = name.starts_with('.') && name.ends_with(TEMP_SUFFIX);
        leftover_temp || self.state_file.as_deref() == Some(asset_path)
    }
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    if let Some(file_name) = target.file_name() {
        name.push(file_name);
    }
    name.push(TEMP_SUFFIX);
    target.with_file_name(name)
}

impl FileFetcher for DirectoryStore {
    fn fetch(&self, path: &str) -> Result<Option<AssetFile>, StoreError> {
        let asset_path = normalize_asset_path(path)?;
        let fs_path = to_fs_path(&self.root, &asset_path);

        if fs_path.is_dir() {
            return Err(StoreError::InvalidPath {
                path: asset_path,
                reason: "expected a file, found a directory".to_string(),
            });
        }

        match fs::read(&fs_path) {
            Ok(data) => Ok(Some(AssetFile::new(&asset_path, data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(fs_path, e)),
        }
    }

    fn fetch_dir(&self, dir: &str) -> Result<Vec<AssetFile>, StoreError> {
        let dir_path = to_fs_path(&self.root, &normalize_asset_path(dir)?);
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&dir_path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir_path.clone());
                StoreError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let asset_path = from_fs_path(&self.root, entry.path())?;
            if self.is_internal(&asset_path) {
                continue;
            }

            let data = fs::read(entry.path()).map_err(|e| StoreError::io(entry.path(), e))?;
            files.push(AssetFile::new(&asset_path, data)?);
        }

        files.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(files)
    }
}
