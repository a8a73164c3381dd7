//! Resolution order, at-most-once builds, cycles and failure propagation.

use super::test_utils::{position, temp_store, Event, TestGraph};
use assetgraph::{Origin, ResolveError, Session};

fn diamond() -> TestGraph {
    TestGraph::new()
        .node("A", &["B", "C"])
        .node("B", &["D"])
        .node("C", &["D"])
        .node("D", &[])
}

#[test]
fn test_diamond_builds_shared_dependency_once() {
    let graph = diamond();
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);

    let a = session.resolve(&graph.id("A")).unwrap();
    assert_eq!(a.files()[0].data(), b"A+B+C");

    assert_eq!(graph.generate_count("D"), 1);
    assert_eq!(graph.generated().len(), 4);

    let b = session.resolve(&graph.id("B")).unwrap();
    let c = session.resolve(&graph.id("C")).unwrap();
    assert_eq!(b.files()[0].data(), b"B+D");
    assert_eq!(c.files()[0].data(), b"C+D");
    assert_eq!(graph.generated().len(), 4);
}

#[test]
fn test_dependencies_done_before_dependent() {
    let graph = diamond();
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);
    session.resolve(&graph.id("A")).unwrap();

    let events = graph.events();
    let at = |name: &str| position(&events, &Event::Generate(name.to_string()));
    assert!(at("D") < at("B"));
    assert!(at("D") < at("C"));
    assert!(at("B") < at("A"));
    assert!(at("C") < at("A"));

    let resolved: Vec<&str> = session
        .resolved()
        .iter()
        .map(|key| key.trim_start_matches("test::"))
        .collect();
    assert_eq!(resolved, vec!["D", "B", "C", "A"]);
}

#[test]
fn test_dependencies_resolve_in_declaration_order() {
    let graph = TestGraph::new()
        .node("root", &["second", "first"])
        .node("first", &[])
        .node("second", &[]);
    let (_temp, store) = temp_store();
    Session::new(&store).resolve(&graph.id("root")).unwrap();

    assert_eq!(graph.generated(), vec!["second", "first", "root"]);
}

#[test]
fn test_resolve_all_shares_one_cache() {
    let graph = diamond();
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);

    let assets = session
        .resolve_all(&[graph.id("B"), graph.id("C"), graph.id("A")])
        .unwrap();
    assert_eq!(assets.len(), 3);
    assert_eq!(graph.generate_count("D"), 1);
    assert_eq!(session.origin(&graph.id("D")), Some(Origin::Generated));
}

#[test]
fn test_two_node_cycle_fails_without_building() {
    let graph = TestGraph::new().node("A", &["B"]).node("B", &["A"]);
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);

    let err = session.resolve(&graph.id("A")).unwrap_err();
    assert!(err.is_cycle());
    assert!(err.report().contains("A -> B -> A"), "{}", err.report());
    assert!(graph.events().is_empty());

    // Both members of the cycle stay failed for the rest of the session.
    let again = session.resolve(&graph.id("B")).unwrap_err();
    assert!(again.is_cycle());
    assert!(graph.events().is_empty());
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let graph = TestGraph::new().node("loop", &["loop"]);
    let (_temp, store) = temp_store();

    let err = Session::new(&store).resolve(&graph.id("loop")).unwrap_err();
    match err.root_cause() {
        ResolveError::Cycle { cycle } => assert_eq!(cycle, &["loop", "loop"]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_failure_propagates_to_every_dependent() {
    let graph = diamond().failing("D");
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);

    let err = session.resolve(&graph.id("A")).unwrap_err();
    assert_eq!(err.chain(), vec!["A", "B", "D"]);
    assert!(matches!(
        err.root_cause(),
        ResolveError::Generate { asset, .. } if asset == "D"
    ));
    let msg = err.report();
    assert!(msg.contains("\"D\""), "{}", msg);
    assert!(msg.contains("D exploded"), "{}", msg);
    assert_eq!(graph.generated(), vec!["D"]);

    // C was never reached, but its only path goes through the failed D.
    let err_c = session.resolve(&graph.id("C")).unwrap_err();
    assert_eq!(err_c.chain(), vec!["C", "D"]);
    assert!(err_c.report().contains("D exploded"));

    let err_b = session.resolve(&graph.id("B")).unwrap_err();
    assert!(err_b.report().contains("D exploded"));

    assert_eq!(graph.generate_count("D"), 1);
    assert_eq!(graph.generate_count("C"), 0);
}

#[test]
fn test_failed_target_replays_original_error() {
    let graph = TestGraph::new().node("X", &[]).failing("X");
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);

    let first = session.resolve(&graph.id("X")).unwrap_err();
    let second = session.resolve(&graph.id("X")).unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(graph.generate_count("X"), 1);
}

#[test]
fn test_unrelated_asset_still_resolves_after_failure() {
    let graph = TestGraph::new()
        .node("bad", &[])
        .node("good", &[])
        .failing("bad");
    let (_temp, store) = temp_store();
    let mut session = Session::new(&store);

    assert!(session.resolve(&graph.id("bad")).is_err());
    let good = session.resolve(&graph.id("good")).unwrap();
    assert_eq!(good.name(), "good");
}

#[test]
fn test_new_session_rebuilds() {
    let graph = diamond();
    let (_temp, store) = temp_store();

    Session::new(&store).resolve(&graph.id("A")).unwrap();
    Session::new(&store).resolve(&graph.id("A")).unwrap();
    assert_eq!(graph.generate_count("D"), 2);
}
