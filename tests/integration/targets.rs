//! Creating install targets with the real installer assets.

use super::test_utils::temp_store;
use assetgraph::manifests::cluster::CLUSTER_CONFIG_FILE;
use assetgraph::manifests::feature_gate::FEATURE_GATE_FILE;
use assetgraph::manifests::install_config::INSTALL_CONFIG_FILE;
use assetgraph::manifests::{FeatureGate, FeatureSet, InstallConfig, Manifests};
use assetgraph::store::FileState;
use assetgraph::targets::{self, Target};
use assetgraph::{ApiError, Asset, AssetFile, AssetId, Origin, ResolveError, Session};
use std::fs;

const TECH_PREVIEW: &str = "\
apiVersion: v1
metadata:
  name: preview
baseDomain: preview.example.org
featureSet: TechPreviewNoUpgrade
";

#[test]
fn test_create_manifests_from_scratch() {
    let (_temp, store) = temp_store();
    let summary = targets::create(&store, Target::Manifests).unwrap();

    assert_eq!(summary.assets.len(), 1);
    let manifests = &summary.assets[0];
    assert_eq!(manifests.name, "Common Manifests");
    assert_eq!(manifests.origin, Origin::Generated);
    // Default feature set: only the cluster config, no feature gate file.
    assert_eq!(manifests.files, vec![CLUSTER_CONFIG_FILE.to_string()]);
    assert!(store.root().join(CLUSTER_CONFIG_FILE).is_file());
    assert!(!store.root().join("openshift").exists());

    assert_eq!(summary.resolved.len(), 3);
    assert!(summary.resolved[0].ends_with("InstallConfig"));
    assert!(summary.resolved[2].ends_with("Manifests"));
}

#[test]
fn test_tailored_install_config_enables_feature_gate() {
    let (_temp, store) = temp_store();
    store
        .write(&AssetFile::new(INSTALL_CONFIG_FILE, TECH_PREVIEW).unwrap())
        .unwrap();

    let mut session = Session::new(&store);
    let gate = session.fetch::<FeatureGate>().unwrap();
    assert_eq!(gate.feature_set(), FeatureSet::TechPreviewNoUpgrade);
    assert_eq!(
        session.origin(&AssetId::of::<InstallConfig>()),
        Some(Origin::Loaded)
    );

    let manifests = session.fetch::<Manifests>().unwrap();
    let paths: Vec<&str> = manifests.files().iter().map(|f| f.path()).collect();
    assert_eq!(paths, vec![CLUSTER_CONFIG_FILE, FEATURE_GATE_FILE]);
    assert_eq!(
        manifests.install_config().unwrap().base_domain,
        "preview.example.org"
    );

    let text = String::from_utf8(manifests.files()[1].data().to_vec()).unwrap();
    assert!(text.contains("featureSet: TechPreviewNoUpgrade"));
}

#[test]
fn test_second_create_reloads_manifests() {
    let (_temp, store) = temp_store();
    targets::create(&store, Target::Manifests).unwrap();

    let summary = targets::create(&store, Target::Manifests).unwrap();
    assert_eq!(summary.assets[0].origin, Origin::Loaded);
}

#[test]
fn test_install_config_then_manifests_uses_written_config() {
    let (_temp, store) = temp_store();
    targets::create(&store, Target::InstallConfig).unwrap();

    let mut session = Session::new(&store);
    session.fetch::<Manifests>().unwrap();
    assert_eq!(
        session.origin(&AssetId::of::<InstallConfig>()),
        Some(Origin::Loaded)
    );
}

#[test]
fn test_malformed_cluster_config_fails_create() {
    let (_temp, store) = temp_store();
    store
        .write(&AssetFile::new(CLUSTER_CONFIG_FILE, "kind: [unclosed").unwrap())
        .unwrap();

    let err = targets::create(&store, Target::Manifests).unwrap_err();
    match err {
        ApiError::Resolve(err) => assert!(matches!(
            err.root_cause(),
            ResolveError::ReloadParse { asset, .. } if asset == "Common Manifests"
        )),
        other => panic!("expected resolve error, got {:?}", other),
    }
    assert_eq!(
        fs::read_to_string(store.root().join(CLUSTER_CONFIG_FILE)).unwrap(),
        "kind: [unclosed"
    );
}

#[test]
fn test_invalid_install_config_names_the_chain() {
    let (_temp, store) = temp_store();
    store
        .write(&AssetFile::new(INSTALL_CONFIG_FILE, "apiVersion: v1\n").unwrap())
        .unwrap();

    let err = match targets::create(&store, Target::Manifests).unwrap_err() {
        ApiError::Resolve(err) => err,
        other => panic!("expected resolve error, got {:?}", other),
    };
    assert_eq!(err.chain(), vec!["Common Manifests", "Install Config"]);
}

#[test]
fn test_state_tracks_user_edits() {
    let (_temp, store) = temp_store();
    targets::create(&store, Target::InstallConfig).unwrap();

    let statuses = store.inspect_state().unwrap();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].path, INSTALL_CONFIG_FILE);
    assert_eq!(statuses[0].state, FileState::Unchanged);

    fs::write(store.root().join(INSTALL_CONFIG_FILE), TECH_PREVIEW).unwrap();
    assert_eq!(store.inspect_state().unwrap()[0].state, FileState::Modified);

    fs::remove_file(store.root().join(INSTALL_CONFIG_FILE)).unwrap();
    assert_eq!(store.inspect_state().unwrap()[0].state, FileState::Missing);
}

#[test]
fn test_reload_with_missing_feature_gate_fails() {
    let (_temp, store) = temp_store();
    store
        .write(&AssetFile::new(INSTALL_CONFIG_FILE, TECH_PREVIEW).unwrap())
        .unwrap();
    let summary = targets::create(&store, Target::Manifests).unwrap();
    assert_eq!(
        summary.assets[0].files,
        vec![CLUSTER_CONFIG_FILE.to_string(), FEATURE_GATE_FILE.to_string()]
    );

    fs::remove_file(store.root().join(FEATURE_GATE_FILE)).unwrap();

    let err = match targets::create(&store, Target::Manifests).unwrap_err() {
        ApiError::Resolve(err) => err,
        other => panic!("expected resolve error, got {:?}", other),
    };
    assert!(matches!(
        err.root_cause(),
        ResolveError::ReloadParse { asset, .. } if asset == "Common Manifests"
    ));
    assert!(err.report().contains(FEATURE_GATE_FILE), "{}", err.report());
    assert!(!store.root().join(FEATURE_GATE_FILE).exists());
}

#[test]
fn test_rerun_keeps_user_edits_marked_modified() {
    let (_temp, store) = temp_store();
    targets::create(&store, Target::InstallConfig).unwrap();
    fs::write(store.root().join(INSTALL_CONFIG_FILE), TECH_PREVIEW).unwrap();

    let summary = targets::create(&store, Target::InstallConfig).unwrap();
    assert_eq!(summary.assets[0].origin, Origin::Loaded);
    assert_eq!(summary.assets[0].files, vec![INSTALL_CONFIG_FILE.to_string()]);

    assert_eq!(store.inspect_state().unwrap()[0].state, FileState::Modified);
    assert_eq!(
        fs::read_to_string(store.root().join(INSTALL_CONFIG_FILE)).unwrap(),
        TECH_PREVIEW
    );
}

#[test]
fn test_state_is_keyed_by_asset_name() {
    let (_temp, store) = temp_store();
    targets::create(&store, Target::Manifests).unwrap();

    let state = store.load_state().unwrap();
    let keys: Vec<&str> = state.assets.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Common Manifests"]);
    assert_eq!(store.inspect_state().unwrap()[0].asset, "Common Manifests");
}
