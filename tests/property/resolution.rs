//! Random acyclic graphs resolve deterministically with at-most-once builds.

use super::test_utils::{position, temp_store, Event, TestGraph};
use assetgraph::Session;
use proptest::prelude::*;
use proptest::sample::Index;

/// Dependency lists for nodes `n0..nN`; node `i` only depends on lower indices.
fn acyclic_graph() -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1usize..10)
        .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(any::<Index>(), 0..4), n))
        .prop_map(|picks| {
            picks
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    if i == 0 {
                        Vec::new()
                    } else {
                        row.iter().map(|index| index.index(i)).collect()
                    }
                })
                .collect()
        })
}

fn name(i: usize) -> String {
    format!("n{}", i)
}

fn build(deps: &[Vec<usize>]) -> TestGraph {
    deps.iter().enumerate().fold(TestGraph::new(), |graph, (i, row)| {
        let names: Vec<String> = row.iter().map(|&d| name(d)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        graph.node(&name(i), &refs)
    })
}

/// Resolve every node, highest index first, and return the completion order.
fn resolve_everything(deps: &[Vec<usize>]) -> (TestGraph, Vec<String>) {
    let graph = build(deps);
    let (_temp, store) = temp_store();
    let ids: Vec<_> = (0..deps.len()).rev().map(|i| graph.id(&name(i))).collect();

    let mut session = Session::new(&store);
    session.resolve_all(&ids).unwrap();
    let resolved = session.resolved().to_vec();
    (graph, resolved)
}

#[test]
fn test_every_asset_built_once_after_its_dependencies() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&acyclic_graph(), |deps| {
            let (graph, resolved) = resolve_everything(&deps);
            prop_assert_eq!(resolved.len(), deps.len());

            let events = graph.events();
            for (i, row) in deps.iter().enumerate() {
                prop_assert_eq!(graph.generate_count(&name(i)), 1);
                let own = position(&events, &Event::Generate(name(i)));
                for &d in row {
                    prop_assert!(position(&events, &Event::Generate(name(d))) < own);
                }
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_resolution_order_is_deterministic() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&acyclic_graph(), |deps| {
            let (_, first) = resolve_everything(&deps);
            let (_, second) = resolve_everything(&deps);
            prop_assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_back_edge_always_reports_cycle() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&(acyclic_graph(), any::<Index>()), |(mut deps, pick)| {
            // Close a loop: the last node is reachable from node 0 and depends on node 0.
            let last = deps.len() - 1;
            deps[0].push(last);
            if last > 0 {
                deps[last].push(0);
            }
            let graph = build(&deps);
            let (_temp, store) = temp_store();

            let start = pick.index(deps.len());
            let err = Session::new(&store)
                .resolve(&graph.id(&name(start)))
                .err();
            // Nodes outside the loop may still resolve; those inside never do.
            if start == 0 || start == last {
                let err = err.expect("loop member resolved");
                prop_assert!(err.is_cycle());
            }
            prop_assert_eq!(graph.generate_count(&name(0)), 0);
            Ok(())
        })
        .unwrap();
}
