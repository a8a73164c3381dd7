//! Resolution session
//!
//! Walks the dependency graph of a requested asset depth-first with an
//! explicit stack. Each asset is built once per session: its dependencies are
//! resolved first (in declaration order), then it is loaded from the store or
//! generated, then it is cached. The in-progress cache entries of the assets
//! currently on the stack form the visiting set used for cycle detection.

use crate::asset::{Asset, AssetId, Parents};
use crate::error::ResolveError;
use crate::graph::cache::{AssetCache, Origin, Status};
use crate::graph::reload::ensure_built;
use crate::store::FileFetcher;
use std::sync::Arc;
use tracing::{debug, trace};

/// An asset on the traversal stack whose dependencies are still being walked.
struct Visit {
    id: AssetId,
    asset: Box<dyn Asset>,
    dependencies: Vec<AssetId>,
    next: usize,
}

impl Visit {
    fn name(&self) -> &str {
        self.asset.name()
    }
}

/// One end-to-end resolution session.
///
/// Owns its cache, so two sessions never share instances. Drop the session
/// to discard everything it built.
pub struct Session<'f> {
    fetcher: &'f dyn FileFetcher,
    cache: AssetCache,
}

impl<'f> Session<'f> {
    pub fn new(fetcher: &'f dyn FileFetcher) -> Self {
        Self {
            fetcher,
            cache: AssetCache::new(),
        }
    }

    /// Resolve `target` and everything it depends on.
    ///
    /// Returns the cached instance if `target` is already done, and the
    /// original error if it already failed in this session.
    pub fn resolve(&mut self, target: &AssetId) -> Result<Arc<dyn Asset>, ResolveError> {
        match self.cache.lookup(target).cloned() {
            Some(Status::Done { asset, .. }) => {
                debug!(asset = %asset.name(), "Reusing previously-fetched asset");
                return Ok(asset);
            }
            Some(Status::Failed(err)) => return Err(err),
            Some(Status::InProgress) => {
                let name = self.display_name(target);
                return Err(ResolveError::Cycle {
                    cycle: vec![name.clone(), name],
                });
            }
            None => {}
        }

        let mut stack = Vec::new();
        self.enter(&mut stack, target.clone());

        while let Some(top) = stack.last_mut() {
            if top.next < top.dependencies.len() {
                let dependency = top.dependencies[top.next].clone();
                top.next += 1;

                match self.cache.lookup(&dependency).cloned() {
                    Some(Status::Done { .. }) => {
                        trace!(asset = %top.name(), dependency = %dependency, "Dependency already done");
                    }
                    Some(Status::InProgress) => {
                        let err = self.cycle_error(&stack, &dependency);
                        return Err(self.unwind(stack, err));
                    }
                    Some(Status::Failed(cause)) => {
                        let err = ResolveError::Dependency {
                            asset: top.name().to_string(),
                            dependency: self.display_name(&dependency),
                            source: Arc::new(cause),
                        };
                        return Err(self.unwind(stack, err));
                    }
                    None => self.enter(&mut stack, dependency),
                }
                continue;
            }

            // All dependencies done: build this asset.
            let Some(visit) = stack.pop() else { break };
            match self.build(visit) {
                Ok(asset) if stack.is_empty() => return Ok(asset),
                Ok(_) => {}
                Err((failed, err)) => {
                    stack.push(failed);
                    return Err(self.unwind(stack, err));
                }
            }
        }

        // The loop only exits through a return once the target is built.
        self.cached(target)
    }

    /// Resolve every id in order, stopping at the first failure.
    pub fn resolve_all(&mut self, ids: &[AssetId]) -> Result<Vec<Arc<dyn Asset>>, ResolveError> {
        ids.iter().map(|id| self.resolve(id)).collect()
    }

    /// Resolve a typed asset and hand it back as its concrete type.
    pub fn fetch<T: Asset + Default>(&mut self) -> Result<Arc<T>, ResolveError> {
        let id = AssetId::of::<T>();
        self.resolve(&id)?
            .into_any_arc()
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch {
                key: id.key().to_string(),
            })
    }

    /// How a done asset was satisfied, or `None` if it is not done.
    pub fn origin(&self, id: &AssetId) -> Option<Origin> {
        match self.cache.lookup(id) {
            Some(Status::Done { origin, .. }) => Some(*origin),
            _ => None,
        }
    }

    /// Keys of done assets in the order they finished. Every asset appears
    /// after all of its dependencies.
    pub fn resolved(&self) -> &[String] {
        self.cache.completed()
    }

    fn enter(&mut self, stack: &mut Vec<Visit>, id: AssetId) {
        let asset = id.instantiate();
        debug!(asset = %asset.name(), key = %id, "Fetching asset");
        self.cache.mark_in_progress(&id, asset.name());
        let dependencies = asset.dependencies();
        stack.push(Visit {
            id,
            asset,
            dependencies,
            next: 0,
        });
    }

    fn build(&mut self, mut visit: Visit) -> Result<Arc<dyn Asset>, (Visit, ResolveError)> {
        let mut parents = Parents::new(visit.name());
        for dependency in &visit.dependencies {
            match self.cache.lookup(dependency) {
                Some(Status::Done { asset, .. }) => parents.insert(dependency, Arc::clone(asset)),
                _ => unreachable!("dependency {} of {} is not done", dependency, visit.name()),
            }
        }

        match ensure_built(&mut *visit.asset, &parents, self.fetcher) {
            Ok(origin) => {
                let Visit { id, asset, .. } = visit;
                let asset: Arc<dyn Asset> = Arc::from(asset);
                debug!(asset = %asset.name(), origin = origin.as_str(), "Asset done");
                self.cache.mark_done(&id, Arc::clone(&asset), origin);
                Ok(asset)
            }
            Err(err) => Err((visit, err)),
        }
    }

    /// Fail the asset on top of `stack` with `err`, then every asset below it
    /// with the failure wrapped in its own name. Returns the outermost error.
    fn unwind(&mut self, mut stack: Vec<Visit>, err: ResolveError) -> ResolveError {
        let Some(failed) = stack.pop() else {
            return err;
        };
        debug!(asset = %failed.name(), error = %err, "Asset failed");
        self.cache.mark_failed(&failed.id, err.clone());

        let mut err = err;
        let mut child = failed.name().to_string();
        while let Some(parent) = stack.pop() {
            err = ResolveError::Dependency {
                asset: parent.name().to_string(),
                dependency: child,
                source: Arc::new(err),
            };
            self.cache.mark_failed(&parent.id, err.clone());
            child = parent.name().to_string();
        }
        err
    }

    fn cycle_error(&self, stack: &[Visit], repeated: &AssetId) -> ResolveError {
        let start = stack
            .iter()
            .position(|visit| &visit.id == repeated)
            .unwrap_or(0);
        let mut cycle: Vec<String> = stack[start..]
            .iter()
            .map(|visit| visit.name().to_string())
            .collect();
        cycle.push(self.display_name(repeated));
        ResolveError::Cycle { cycle }
    }

    fn cached(&self, id: &AssetId) -> Result<Arc<dyn Asset>, ResolveError> {
        match self.cache.lookup(id) {
            Some(Status::Done { asset, .. }) => Ok(Arc::clone(asset)),
            Some(Status::Failed(err)) => Err(err.clone()),
            _ => {
                let name = self.display_name(id);
                Err(ResolveError::Cycle {
                    cycle: vec![name.clone(), name],
                })
            }
        }
    }

    fn display_name(&self, id: &AssetId) -> String {
        self.cache
            .name_of(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.key().to_string())
    }
}
