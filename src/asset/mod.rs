//! Assets
//!
//! An asset is a named unit of generated install state. It declares the assets
//! it needs, produces its files from their resolved instances, and can try to
//! rebuild itself from files that an earlier run already wrote.

mod parents;

pub use parents::Parents;

use crate::error::StoreError;
use crate::store::path::normalize_asset_path;
use crate::store::FileFetcher;
use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Type-erasure helpers so resolved assets can be handed back as their concrete type.
///
/// Implemented for every `Send + Sync + 'static` type; asset authors never implement it.
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// The contract every asset implements.
///
/// `generate` and `load` are only ever called by the resolver, at most one of
/// them per session, and only after every declared dependency is done.
pub trait Asset: AsAny {
    /// Human-friendly name used in logs and errors.
    fn name(&self) -> &str;

    /// Assets directly needed to generate this one, in resolution order.
    ///
    /// Must not depend on this asset's own generated state.
    fn dependencies(&self) -> Vec<AssetId> {
        Vec::new()
    }

    /// Build this asset's state and files from its resolved dependencies.
    fn generate(&mut self, parents: &Parents) -> anyhow::Result<()>;

    /// Files produced by `generate` or `load`. Empty until one of them ran.
    fn files(&self) -> &[AssetFile] {
        &[]
    }

    /// Rebuild this asset from previously written files.
    ///
    /// `Ok(false)` means nothing was persisted and the asset must be generated.
    /// An error means persisted files exist but could not be understood.
    fn load(&mut self, _fetcher: &dyn FileFetcher) -> anyhow::Result<bool> {
        Ok(false)
    }
}

impl fmt::Debug for dyn Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Asset").field("name", &self.name()).finish()
    }
}

impl dyn Asset {
    pub fn downcast_ref<T: Asset>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Asset>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

type Factory = dyn Fn() -> Box<dyn Asset> + Send + Sync;

/// Stable identity of an asset and the recipe for a fresh instance of it.
///
/// Equality and hashing use the key only. Typed assets are keyed by their Rust
/// type name, so `AssetId::of::<T>()` always names the same cache slot. The
/// type name is only stable within one build and never leaves the process.
#[derive(Clone)]
pub struct AssetId {
    key: Cow<'static, str>,
    factory: Arc<Factory>,
}

impl AssetId {
    /// Identity of a typed asset, instantiated through `Default`.
    pub fn of<T: Asset + Default>() -> Self {
        Self {
            key: Cow::Borrowed(type_name::<T>()),
            factory: Arc::new(|| Box::new(T::default()) as Box<dyn Asset>),
        }
    }

    /// Identity with an explicit key and factory, for assets whose shape is
    /// only known at runtime.
    pub fn new<F>(key: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Asset> + Send + Sync + 'static,
    {
        Self {
            key: Cow::Owned(key.into()),
            factory: Arc::new(factory),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn key_of<T: Asset>() -> &'static str {
        type_name::<T>()
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Asset> {
        (self.factory)()
    }
}

impl PartialEq for AssetId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for AssetId {}

impl Hash for AssetId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetId").field(&self.key).finish()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// One generated file: a root-relative, forward-slash path and its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    path: String,
    data: Vec<u8>,
}

impl AssetFile {
    /// Create a file, normalizing and validating its path.
    pub fn new(path: &str, data: impl Into<Vec<u8>>) -> Result<Self, StoreError> {
        Ok(Self {
            path: normalize_asset_path(path)?,
            data: data.into(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
