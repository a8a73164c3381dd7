//! Install targets
//!
//! A target names the top-level assets a user asks for. Creating a target
//! resolves them in one session and writes their files to the store.

use crate::asset::{Asset, AssetId};
use crate::error::ApiError;
use crate::graph::{Origin, Session};
use crate::manifests::{InstallConfig, Manifests};
use crate::store::DirectoryStore;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    InstallConfig,
    Manifests,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::InstallConfig, Target::Manifests];

    pub fn name(&self) -> &'static str {
        match self {
            Target::InstallConfig => "install-config",
            Target::Manifests => "manifests",
        }
    }

    /// Top-level assets of this target, in creation order.
    pub fn assets(&self) -> Vec<AssetId> {
        match self {
            Target::InstallConfig => vec![AssetId::of::<InstallConfig>()],
            Target::Manifests => vec![AssetId::of::<Manifests>()],
        }
    }

    fn names() -> String {
        Self::ALL
            .iter()
            .map(Target::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|target| target.name() == s)
            .ok_or_else(|| ApiError::UnknownTarget(s.to_string(), Self::names()))
    }
}

/// One top-level asset written by [`create`].
#[derive(Debug, Clone)]
pub struct CreatedAsset {
    pub name: String,
    pub key: String,
    pub origin: Origin,
    pub files: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSummary {
    pub target: Target,
    pub assets: Vec<CreatedAsset>,
    /// Keys of every asset the session built, dependencies first.
    pub resolved: Vec<String>,
}

/// Resolve every asset of `target` and persist the files of those that were
/// generated into `store`.
///
/// State records are keyed by asset name, which stays stable across builds.
pub fn create(store: &DirectoryStore, target: Target) -> Result<CreateSummary, ApiError> {
    let mut session = Session::new(store);
    let mut assets = Vec::new();

    for id in target.assets() {
        let asset = session.resolve(&id)?;
        let origin = session.origin(&id).unwrap_or(Origin::Generated);
        // Loaded files may be user-tailored: leave them and their recorded hashes alone.
        let files = match origin {
            Origin::Generated => store.persist(asset.name(), &*asset)?,
            Origin::Loaded => asset.files().iter().map(|f| f.path().to_string()).collect(),
        };
        info!(
            target = %target,
            asset = %asset.name(),
            origin = origin.as_str(),
            files = files.len(),
            "Created asset"
        );
        assets.push(CreatedAsset {
            name: asset.name().to_string(),
            key: id.key().to_string(),
            origin,
            files,
        });
    }

    Ok(CreateSummary {
        target,
        assets,
        resolved: session.resolved().to_vec(),
    })
}

/// Render the dependency tree of `target`.
///
/// Subtrees already printed are marked `(*)` and not expanded again; an edge
/// back into the current path is marked `(cycle)`.
pub fn graph(target: Target) -> String {
    let mut out = String::new();
    let mut shown = HashSet::new();
    for id in target.assets() {
        let mut path = Vec::new();
        render(&id, "", "", &mut path, &mut shown, &mut out);
    }
    out
}

fn render(
    id: &AssetId,
    lead: &str,
    indent: &str,
    path: &mut Vec<AssetId>,
    shown: &mut HashSet<AssetId>,
    out: &mut String,
) {
    let asset = id.instantiate();
    if path.contains(id) {
        out.push_str(&format!("{}{} (cycle)\n", lead, asset.name()));
        return;
    }
    if !shown.insert(id.clone()) {
        out.push_str(&format!("{}{} (*)\n", lead, asset.name()));
        return;
    }
    out.push_str(&format!("{}{}\n", lead, asset.name()));

    let dependencies = asset.dependencies();
    path.push(id.clone());
    for (i, dependency) in dependencies.iter().enumerate() {
        let last = i + 1 == dependencies.len();
        let (branch, next) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        render(
            dependency,
            &format!("{}{}", indent, branch),
            &format!("{}{}", indent, next),
            path,
            shown,
            out,
        );
    }
    path.pop();
}
