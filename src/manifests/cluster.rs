//! Cluster manifests asset
//!
//! Aggregates the manifests an install needs: the install config embedded in
//! the `cluster-config-v1` config map, plus whatever the feature gate emitted.

use crate::asset::{Asset, AssetFile, AssetId, Parents};
use crate::manifests::feature_gate::{FeatureGate, FEATURE_GATE_FILE};
use crate::manifests::install_config::{InstallConfig, InstallConfigDocument};
use crate::manifests::ObjectMeta;
use crate::store::FileFetcher;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CLUSTER_CONFIG_FILE: &str = "manifests/cluster-config.yaml";
pub const OPENSHIFT_DIR: &str = "openshift";

const CONFIG_MAP_KIND: &str = "ConfigMap";
const CONFIG_MAP_NAME: &str = "cluster-config-v1";
const CONFIG_MAP_NAMESPACE: &str = "kube-system";
const INSTALL_CONFIG_KEY: &str = "install-config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ConfigMap {
    fn cluster_config(install_config: &str) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: CONFIG_MAP_KIND.to_string(),
            metadata: ObjectMeta {
                name: CONFIG_MAP_NAME.to_string(),
                namespace: Some(CONFIG_MAP_NAMESPACE.to_string()),
            },
            data: BTreeMap::from([(INSTALL_CONFIG_KEY.to_string(), install_config.to_string())]),
        }
    }

    /// The install config carried by a `cluster-config-v1` config map.
    fn install_config(&self) -> anyhow::Result<InstallConfigDocument> {
        if self.kind != CONFIG_MAP_KIND {
            bail!("expected kind {}, found {:?}", CONFIG_MAP_KIND, self.kind);
        }
        let embedded = self
            .data
            .get(INSTALL_CONFIG_KEY)
            .with_context(|| format!("config map has no {:?} key", INSTALL_CONFIG_KEY))?;
        InstallConfigDocument::parse(embedded.as_bytes())
    }
}

/// Manifests handed to the cluster at install time.
#[derive(Debug, Default)]
pub struct Manifests {
    install_config: Option<InstallConfigDocument>,
    files: Vec<AssetFile>,
}

impl Manifests {
    /// Install config recorded in the cluster config map.
    pub fn install_config(&self) -> Option<&InstallConfigDocument> {
        self.install_config.as_ref()
    }
}

impl Asset for Manifests {
    fn name(&self) -> &str {
        "Common Manifests"
    }

    fn dependencies(&self) -> Vec<AssetId> {
        vec![AssetId::of::<InstallConfig>(), AssetId::of::<FeatureGate>()]
    }

    fn generate(&mut self, parents: &Parents) -> anyhow::Result<()> {
        let install = parents
            .try_get::<InstallConfig>()?
            .config()
            .context("install config has not been built")?
            .clone();
        let feature_gate = parents.try_get::<FeatureGate>()?;

        let config_map = ConfigMap::cluster_config(&install.to_yaml()?);
        let data =
            serde_yaml::to_string(&config_map).context("failed to create cluster config map")?;

        let mut files = vec![AssetFile::new(CLUSTER_CONFIG_FILE, data)?];
        files.extend(feature_gate.files().iter().cloned());

        self.install_config = Some(install);
        self.files = files;
        Ok(())
    }

    fn files(&self) -> &[AssetFile] {
        &self.files
    }

    fn load(&mut self, fetcher: &dyn FileFetcher) -> anyhow::Result<bool> {
        let Some(cluster_config) = fetcher.fetch(CLUSTER_CONFIG_FILE)? else {
            return Ok(false);
        };

        let config_map: ConfigMap = serde_yaml::from_slice(cluster_config.data())
            .with_context(|| format!("failed to parse {}", CLUSTER_CONFIG_FILE))?;
        let install = config_map
            .install_config()
            .with_context(|| format!("invalid {}", CLUSTER_CONFIG_FILE))?;

        let mut files = vec![cluster_config];
        files.extend(fetcher.fetch_dir(OPENSHIFT_DIR)?);

        let has_gate = files.iter().any(|f| f.path() == FEATURE_GATE_FILE);
        if !install.feature_set.is_default() && !has_gate {
            bail!(
                "feature set {} requires {}, which is missing",
                install.feature_set,
                FEATURE_GATE_FILE
            );
        }

        self.install_config = Some(install);
        self.files = files;
        Ok(true)
    }
}
