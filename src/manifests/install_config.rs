//! Install config asset
//!
//! The user-facing configuration every other asset is derived from. It is
//! read back from `install-config.yaml` when present, so a user can write or
//! tailor that file before creating anything downstream.

use crate::asset::{Asset, AssetFile, Parents};
use crate::manifests::ObjectMeta;
use crate::store::FileFetcher;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const INSTALL_CONFIG_FILE: &str = "install-config.yaml";

const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_CLUSTER_NAME: &str = "cluster";
const DEFAULT_BASE_DOMAIN: &str = "example.com";

/// Named collection of cluster features to enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeatureSet {
    #[default]
    #[serde(alias = "")]
    Default,
    TechPreviewNoUpgrade,
    CustomNoUpgrade,
}

impl FeatureSet {
    pub const ALL: [FeatureSet; 3] = [
        FeatureSet::Default,
        FeatureSet::TechPreviewNoUpgrade,
        FeatureSet::CustomNoUpgrade,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureSet::Default => "Default",
            FeatureSet::TechPreviewNoUpgrade => "TechPreviewNoUpgrade",
            FeatureSet::CustomNoUpgrade => "CustomNoUpgrade",
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, FeatureSet::Default)
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(FeatureSet::Default);
        }
        FeatureSet::ALL
            .into_iter()
            .find(|set| set.as_str() == s)
            .with_context(|| format!("unknown feature set {:?}", s))
    }
}

/// Contents of `install-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfigDocument {
    pub api_version: String,
    pub metadata: ObjectMeta,
    pub base_domain: String,
    #[serde(default)]
    pub feature_set: FeatureSet,
}

impl InstallConfigDocument {
    /// Parse and validate an install config.
    pub fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let document: Self =
            serde_yaml::from_slice(data).context("failed to parse install config")?;
        document.validate()?;
        Ok(document)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version.trim().is_empty() {
            bail!("apiVersion is required");
        }
        if self.metadata.name.trim().is_empty() {
            bail!("metadata.name is required");
        }
        if self.base_domain.trim().is_empty() {
            bail!("baseDomain is required");
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        serde_yaml::to_string(self).context("failed to serialize install config")
    }
}

impl Default for InstallConfigDocument {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            metadata: ObjectMeta::named(DEFAULT_CLUSTER_NAME),
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            feature_set: FeatureSet::Default,
        }
    }
}

/// Asset wrapping [`InstallConfigDocument`].
#[derive(Debug, Default)]
pub struct InstallConfig {
    config: Option<InstallConfigDocument>,
    files: Vec<AssetFile>,
}

impl InstallConfig {
    /// The parsed config, once generated or loaded.
    pub fn config(&self) -> Option<&InstallConfigDocument> {
        self.config.as_ref()
    }
}

impl Asset for InstallConfig {
    fn name(&self) -> &str {
        "Install Config"
    }

    fn generate(&mut self, _parents: &Parents) -> anyhow::Result<()> {
        let config = InstallConfigDocument::default();
        self.files = vec![AssetFile::new(INSTALL_CONFIG_FILE, config.to_yaml()?)?];
        self.config = Some(config);
        Ok(())
    }

    fn files(&self) -> &[AssetFile] {
        &self.files
    }

    fn load(&mut self, fetcher: &dyn FileFetcher) -> anyhow::Result<bool> {
        let Some(file) = fetcher.fetch(INSTALL_CONFIG_FILE)? else {
            return Ok(false);
        };
        let config = InstallConfigDocument::parse(file.data())
            .with_context(|| format!("invalid {}", INSTALL_CONFIG_FILE))?;
        self.config = Some(config);
        self.files = vec![file];
        Ok(true)
    }
}
