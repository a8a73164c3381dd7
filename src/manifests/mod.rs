//! Installer assets
//!
//! `Manifests` depends on `InstallConfig` and `FeatureGate`; `FeatureGate`
//! depends on `InstallConfig`.

pub mod cluster;
pub mod feature_gate;
pub mod install_config;

pub use cluster::Manifests;
pub use feature_gate::FeatureGate;
pub use install_config::{FeatureSet, InstallConfig, InstallConfigDocument};

use serde::{Deserialize, Serialize};

/// Kubernetes-style object metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }
}
