#![allow(missing_docs)]
#![cfg(not(feature = "loom"))]

mod common;

use common::{TestGraph, host, kernel, pull, push, transfer};
use hfg::types::{DeviceId, NodeId};
use proptest::prelude::*;

fn hosts(graph: &mut TestGraph, n: usize) -> Vec<NodeId> {
    (0..n).map(|_| graph.insert(host()).unwrap()).collect()
}

#[test]
fn union_chain_of_three() {
    let mut graph = TestGraph::new();
    let [b, c, d] = [0, 1, 2].map(|dev| graph.insert(pull(dev)).unwrap());

    graph.union(b, c);
    graph.union(c, d);

    assert_eq!(graph.find(b), graph.find(d));
    assert_eq!(graph.set_size(b), 3);
    assert_eq!(graph.set_size(d), 3);
}

#[test]
fn singleton_is_its_own_root() {
    let mut graph = TestGraph::new();
    let a = graph.insert(host()).unwrap();
    assert_eq!(graph.root(a), a);
    assert_eq!(graph.find(a), a);
    assert_eq!(graph.set_size(a), 1);
}

#[test]
fn smaller_set_goes_under_larger() {
    let mut graph = TestGraph::new();
    let ids = hosts(&mut graph, 4);
    // Tie: the second root is attached under the first.
    graph.union(ids[0], ids[1]);
    assert_eq!(graph.root(ids[1]), ids[0]);

    graph.union(ids[2], ids[3]);
    graph.union(ids[2], ids[1]);
    // Equal sizes again, so {2, 3} keeps its root and absorbs {0, 1}.
    assert_eq!(graph.root(ids[0]), ids[2]);

    let lone = graph.insert(host()).unwrap();
    graph.union(lone, ids[3]);
    assert_eq!(graph.root(lone), ids[2]);
    assert_eq!(graph.set_size(lone), 5);
}

#[test]
fn find_reaches_the_true_root_of_deep_trees() {
    let mut graph = TestGraph::new();
    let ids = hosts(&mut graph, 8);
    for pair in ids.chunks(2) {
        graph.union(pair[0], pair[1]);
    }
    graph.union(ids[0], ids[2]);
    graph.union(ids[4], ids[6]);
    graph.union(ids[0], ids[4]);

    // ids[7] sits three links below the root.
    let root = graph.root(ids[0]);
    assert_eq!(root, ids[0]);
    assert_eq!(graph.root(ids[7]), root);
    let found = graph.find(ids[7]);
    assert_eq!(found, root);
    assert_eq!(graph.find(found), root);
    assert_eq!(graph.set_size(ids[5]), 8);
    for &id in &ids {
        assert_eq!(graph.find(id), root);
    }
}

#[test]
fn repeated_union_is_a_no_op() {
    let mut graph = TestGraph::new();
    let ids = hosts(&mut graph, 3);
    graph.union(ids[0], ids[1]);
    graph.union(ids[1], ids[2]);
    graph.union(ids[2], ids[0]);
    graph.union(ids[0], ids[0]);
    assert_eq!(graph.set_size(ids[0]), 3);
}

#[test]
fn unite_affinities_follows_buffer_references() {
    let mut graph = TestGraph::new();
    let a = graph.insert(pull(0)).unwrap();
    let b = graph.insert(pull(0)).unwrap();
    let c = graph.insert(pull(1)).unwrap();
    let k = graph.insert(kernel(0, &[a, b])).unwrap();
    let s = graph.insert(push(a)).unwrap();
    let t = graph.insert(transfer(b, c)).unwrap();
    let h = graph.insert(host()).unwrap();

    graph.unite_affinities();

    let root = graph.find(k);
    for id in [a, b, s] {
        assert_eq!(graph.find(id), root);
    }
    assert_eq!(graph.set_size(k), 4);
    for id in [c, t, h] {
        assert_eq!(graph.set_size(id), 1);
    }
}

#[test]
fn resolve_gives_each_device_set_one_group() {
    let mut graph = TestGraph::new();
    let a = graph.insert(pull(0)).unwrap();
    let b = graph.insert(pull(1)).unwrap();
    let k = graph.insert(kernel(0, &[a])).unwrap();
    let h = graph.insert(host()).unwrap();
    graph.unite_affinities();
    graph.union(h, a);

    assert_eq!(graph.resolve_device_groups(), 2);
    assert_eq!(graph.num_groups(), 2);
    assert_eq!(graph.node(a).group(), graph.node(k).group());
    assert_ne!(graph.node(a).group(), graph.node(b).group());
    assert_eq!(graph.node(h).group(), None);
    assert!(graph.group_of(h).is_none());

    let group = graph.group_of(k).unwrap();
    assert_eq!(group.device(), None);
    assert_eq!(group.claim(DeviceId(1)), DeviceId(1));
    assert_eq!(graph.group_of(a).unwrap().device(), Some(DeviceId(1)));

    // Resolving again reuses the groups already in place.
    assert_eq!(graph.resolve_device_groups(), 2);
    assert_eq!(graph.num_groups(), 2);
}

#[test]
fn resolve_adopts_an_assigned_group() {
    let mut graph = TestGraph::new();
    let a = graph.insert(pull(0)).unwrap();
    let k = graph.insert(kernel(0, &[a])).unwrap();
    let preset = graph.add_group();
    graph.assign_group(k, preset);
    graph.unite_affinities();

    assert_eq!(graph.resolve_device_groups(), 1);
    assert_eq!(graph.num_groups(), 1);
    assert_eq!(graph.node(a).group(), Some(preset));
}

#[test]
#[should_panic(expected = "cannot join a device group")]
fn host_cannot_be_grouped() {
    let mut graph = TestGraph::new();
    let h = graph.insert(host()).unwrap();
    let group = graph.add_group();
    graph.assign_group(h, group);
}

/// Component labels computed by brute-force relabelling.
fn components(n: usize, unions: &[(usize, usize)]) -> Vec<usize> {
    let mut label: Vec<usize> = (0..n).collect();
    for &(a, b) in unions {
        let (from, to) = (label[a], label[b]);
        for l in &mut label {
            if *l == from {
                *l = to;
            }
        }
    }
    label
}

fn unions_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1..24usize).prop_flat_map(|n| {
        let pair = (0..n, 0..n);
        (Just(n), proptest::collection::vec(pair, 0..40))
    })
}

proptest! {
    #[test]
    fn same_root_iff_connected((n, unions) in unions_strategy()) {
        let mut graph = TestGraph::new();
        let ids = hosts(&mut graph, n);
        for &(a, b) in &unions {
            graph.union(ids[a], ids[b]);
        }
        let labels = components(n, &unions);
        for a in 0..n {
            let root = graph.find(ids[a]);
            prop_assert_eq!(graph.find(root), root);
            prop_assert_eq!(graph.root(ids[a]), root);
            let expected_size = labels.iter().filter(|&&l| l == labels[a]).count();
            prop_assert_eq!(graph.set_size(ids[a]) as usize, expected_size);
            for b in 0..n {
                let connected = labels[a] == labels[b];
                prop_assert_eq!(graph.find(ids[b]) == root, connected);
            }
        }
    }
}
