use okapi::{Graph, Topology, XorShift64Star};
use std::collections::BTreeSet;

#[test]
fn disconnected_pairs_form_two_components_in_input_order() {
    let g = Graph::from_ids(["n1", "n2", "n3", "n4"], [("n1", "n2"), ("n3", "n4")]);
    let s = Topology::analyze(&g).summary();
    assert_eq!(s.components, vec![vec!["n1", "n2"], vec!["n3", "n4"]]);
    assert_eq!(s.linked, vec!["n1", "n2", "n3", "n4"]);
    assert!(s.unlinked.is_empty());
}

#[test]
fn nodes_without_valid_edges_are_unlinked() {
    let g = Graph::from_ids(["a", "b", "c"], [("a", "b"), ("c", "nowhere")]);
    let s = Topology::analyze(&g).summary();
    assert_eq!(s.linked, vec!["a", "b"]);
    assert_eq!(s.unlinked, vec!["c"]);
}

#[test]
fn components_partition_the_linked_nodes() {
    for seed in 1..20u64 {
        let mut rng = XorShift64Star::new(seed);
        let n = 5 + (rng.next_u64() % 40) as usize;
        let m = (rng.next_u64() % (n as u64)) as usize;
        let ids: Vec<String> = (0..n).map(|i| format!("v{i}")).collect();
        let edges: Vec<(usize, usize)> = (0..m)
            .map(|_| {
                (
                    (rng.next_u64() % n as u64) as usize,
                    (rng.next_u64() % n as u64) as usize,
                )
            })
            .collect();
        let t = Topology::build(
            ids.iter().map(String::as_str),
            edges.iter().map(|&(a, b)| (ids[a].as_str(), ids[b].as_str())),
        );

        let linked: BTreeSet<usize> = t.linked().iter().copied().collect();
        let mut seen: BTreeSet<usize> = BTreeSet::new();
        for c in t.components() {
            assert!(!c.is_empty(), "seed {seed}: empty component");
            for &v in c {
                assert!(seen.insert(v), "seed {seed}: {v} in two components");
            }
        }
        assert_eq!(seen, linked, "seed {seed}");

        // No edge crosses a component boundary.
        let mut component_of = vec![usize::MAX; n];
        for (ci, c) in t.components().iter().enumerate() {
            for &v in c {
                component_of[v] = ci;
            }
        }
        for &(a, b) in t.edges() {
            assert_eq!(component_of[a], component_of[b], "seed {seed}");
        }
    }
}
