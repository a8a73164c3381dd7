//! Feature gate asset
//!
//! Emits the cluster `FeatureGate` manifest only when the install config
//! selects a non-default feature set. With the default set it produces no
//! files at all.

use crate::asset::{Asset, AssetFile, AssetId, Parents};
use crate::manifests::install_config::{FeatureSet, InstallConfig};
use crate::manifests::ObjectMeta;
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const FEATURE_GATE_FILE: &str = "openshift/99_feature-gate.yaml";

const FEATURE_GATE_API_VERSION: &str = "config.openshift.io/v1";
const FEATURE_GATE_KIND: &str = "FeatureGate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateManifest {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: FeatureGateSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateSpec {
    pub feature_set: FeatureSet,
}

impl FeatureGateManifest {
    pub fn cluster(feature_set: FeatureSet) -> Self {
        Self {
            api_version: FEATURE_GATE_API_VERSION.to_string(),
            kind: FEATURE_GATE_KIND.to_string(),
            metadata: ObjectMeta::named("cluster"),
            spec: FeatureGateSpec { feature_set },
        }
    }
}

/// Feature gate derived from the install config.
///
/// Has no persisted form of its own: `load` always reports absent, so it is
/// regenerated from the install config every session.
#[derive(Debug, Default)]
pub struct FeatureGate {
    feature_set: FeatureSet,
    files: Vec<AssetFile>,
}

impl FeatureGate {
    pub fn feature_set(&self) -> FeatureSet {
        self.feature_set
    }
}

impl Asset for FeatureGate {
    fn name(&self) -> &str {
        "Feature Gate Config"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        vec![AssetId::of::<InstallConfig>()]
    }

    fn generate(&mut self, parents: &Parents) -> anyhow::Result<()> {
        let install = parents.try_get::<InstallConfig>()?;
        let config = install
            .config()
            .context("install config has not been built")?;

        self.feature_set = config.feature_set;
        self.files.clear();
        if self.feature_set.is_default() {
            return Ok(());
        }

        let manifest = FeatureGateManifest::cluster(self.feature_set);
        let data = serde_yaml::to_string(&manifest)
            .with_context(|| format!("failed to create {} manifest", self.name()))?;
        self.files.push(AssetFile::new(FEATURE_GATE_FILE, data)?);
        Ok(())
    }

    fn files(&self) -> &[AssetFile] {
        &self.files
    }
}
