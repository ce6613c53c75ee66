use std::collections::HashSet;
use stratum::Graph;

fn build_layered_graph() -> Graph {
    let mut graph = Graph::default();
    for layer in ["high", "medium", "low"] {
        graph.get_or_add_module(&format!("mypackage.{layer}"));
    }
    graph
}

#[test]
fn deep_layered_architecture_reports_every_illegal_pair() {
    let mut graph = build_layered_graph();

    let high = graph.get_or_add_module("mypackage.high.api").token();
    let medium = graph.get_or_add_module("mypackage.medium.service").token();
    let low = graph.get_or_add_module("mypackage.low.repo").token();

    // medium -> low is legal (medium sits above low); low -> high and low -> medium are not.
    graph.add_import(medium, low);
    graph.add_import(low, high);
    graph.add_import(low, medium);

    let deps = graph
        .find_illegal_dependencies_for_layers(
            &["high", "medium", "low"],
            &HashSet::from(["mypackage"]),
        )
        .unwrap();

    let pairs: HashSet<(String, String)> = deps
        .iter()
        .map(|dep| (dep.upstream.clone(), dep.downstream.clone()))
        .collect();

    assert_eq!(
        pairs,
        HashSet::from([
            ("mypackage.high".to_string(), "mypackage.low".to_string()),
            ("mypackage.medium".to_string(), "mypackage.low".to_string()),
        ])
    );
}

#[test]
fn result_is_idempotent_across_repeated_calls() {
    let mut graph = build_layered_graph();
    let high = graph.get_or_add_module("mypackage.high.api").token();
    let low = graph.get_or_add_module("mypackage.low.repo").token();
    graph.add_import(low, high);

    let first = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["mypackage"]))
        .unwrap();
    let second = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["mypackage"]))
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn legal_import_does_not_affect_result() {
    let mut graph = build_layered_graph();
    let high = graph.get_or_add_module("mypackage.high.api").token();
    let low = graph.get_or_add_module("mypackage.low.repo").token();
    graph.add_import(low, high);

    let before = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["mypackage"]))
        .unwrap();

    // Legal direction: high depends on low.
    graph.add_import(high, low);

    let after = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["mypackage"]))
        .unwrap();

    assert_eq!(before, after);
}

#[test]
fn removing_the_illegal_edge_empties_the_result() {
    let mut graph = build_layered_graph();
    let high = graph.get_or_add_module("mypackage.high.api").token();
    let low = graph.get_or_add_module("mypackage.low.repo").token();
    graph.add_import(low, high);

    let before = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["mypackage"]))
        .unwrap();
    assert_eq!(before.len(), 1);

    graph.remove_import(low, high);

    let after = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["mypackage"]))
        .unwrap();
    assert!(after.is_empty());
}

#[test]
fn multiple_containers_are_analysed_independently() {
    let mut graph = Graph::default();
    for container in ["one", "two"] {
        for layer in ["high", "low"] {
            graph.get_or_add_module(&format!("{container}.{layer}"));
        }
    }

    let one_high = graph.get_or_add_module("one.high.green").token();
    let one_low = graph.get_or_add_module("one.low.white").token();
    let two_high = graph.get_or_add_module("two.high.green").token();
    let two_low = graph.get_or_add_module("two.low.white").token();

    graph.add_import(one_low, one_high);
    // "two" has no violation.
    graph.add_import(two_high, two_low);

    let deps = graph
        .find_illegal_dependencies_for_layers(&["high", "low"], &HashSet::from(["one", "two"]))
        .unwrap();

    assert_eq!(deps.len(), 1);
    let dep = deps.iter().next().unwrap();
    assert_eq!(dep.upstream, "one.high");
    assert_eq!(dep.downstream, "one.low");
}
