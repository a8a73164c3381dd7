//! Reload coordinator: load from persisted files, or generate.

use crate::asset::{Asset, Parents};
use crate::error::ResolveError;
use crate::graph::cache::Origin;
use crate::store::FileFetcher;
use std::sync::Arc;
use tracing::debug;

/// Satisfy `asset` for this session.
///
/// Persisted files win over generation. A load that finds files it cannot
/// parse is fatal; the asset is never regenerated over them.
pub fn ensure_built(
    asset: &mut dyn Asset,
    parents: &Parents,
    fetcher: &dyn FileFetcher,
) -> Result<Origin, ResolveError> {
    let name = asset.name().to_string();

    let found = asset
        .load(fetcher)
        .map_err(|cause| ResolveError::ReloadParse {
            asset: name.clone(),
            cause: Arc::new(cause),
        })?;

    if found {
        debug!(asset = %name, files = asset.files().len(), "Loaded asset from disk");
        return Ok(Origin::Loaded);
    }

    debug!(asset = %name, "Generating asset");
    asset
        .generate(parents)
        .map_err(|cause| ResolveError::Generate {
            asset: name,
            cause: Arc::new(cause),
        })?;

    Ok(Origin::Generated)
}
