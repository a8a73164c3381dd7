//! assetgraph: dependency-ordered generation of install assets
//!
//! Assets declare the assets they depend on. A resolution session walks that
//! graph depth-first, builds every asset at most once, and for each one
//! prefers files persisted by an earlier run over generating it again.

pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod logging;
pub mod manifests;
pub mod store;
pub mod targets;

pub use asset::{Asset, AssetFile, AssetId, Parents};
pub use error::{ApiError, ResolveError, StoreError};
pub use graph::{Origin, Session};
pub use store::{DirectoryStore, FileFetcher};
