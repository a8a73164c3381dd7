//! Parent set: the resolved dependencies handed to an asset's `generate`.

use crate::asset::{Asset, AssetId};
use crate::error::ResolveError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only view of an asset's resolved dependencies.
///
/// Only the resolver builds one, and only from instances that are already
/// done, so an asset can never observe a half-built dependency. Reading an
/// asset that was not declared in `dependencies()` is a bug in the caller.
pub struct Parents {
    owner: String,
    entries: BTreeMap<String, Arc<dyn Asset>>,
}

impl Parents {
    pub(crate) fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, id: &AssetId, asset: Arc<dyn Asset>) {
        self.entries.insert(id.key().to_string(), asset);
    }

    /// Resolved instance of a declared dependency.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not one of the owner's declared dependencies.
    pub fn get<T: Asset>(&self) -> &T {
        match self.try_get::<T>() {
            Ok(asset) => asset,
            Err(err) => panic!("{}", err),
        }
    }

    /// Like [`Parents::get`], but reports an undeclared read as an error.
    pub fn try_get<T: Asset>(&self) -> Result<&T, ResolveError> {
        let key = AssetId::key_of::<T>();
        self.entries
            .get(key)
            .and_then(|asset| asset.downcast_ref::<T>())
            .ok_or_else(|| self.undeclared(key))
    }

    /// Resolved instance by identity, for assets that are not statically typed.
    pub fn get_by_id(&self, id: &AssetId) -> Result<&dyn Asset, ResolveError> {
        self.entries
            .get(id.key())
            .map(|asset| &**asset)
            .ok_or_else(|| self.undeclared(id.key()))
    }

    /// Name of the asset these parents belong to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dependency keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn undeclared(&self, key: &str) -> ResolveError {
        ResolveError::UndeclaredDependency {
            asset: self.owner.clone(),
            dependency: key.to_string(),
        }
    }
}
