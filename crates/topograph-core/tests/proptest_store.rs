use proptest::prelude::*;
use topograph_core::{KnowledgeEdge, KnowledgeGraph, KnowledgeNode};

/// Small id alphabet so random edge lists hit duplicates, loops, and
/// dangling endpoints often.
fn arb_id() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|i| format!("n{i}"))
}

fn arb_graph() -> impl Strategy<Value = KnowledgeGraph> {
    (
        prop::collection::vec(arb_id(), 0..8),
        prop::collection::vec((arb_id(), arb_id()), 0..16),
    )
        .prop_map(|(nodes, edges)| {
            let mut graph = KnowledgeGraph::new();
            for id in nodes {
                graph.add_node(KnowledgeNode::new(id.clone(), id.to_uppercase()));
            }
            for (source, target) in edges {
                graph.add_edge(KnowledgeEdge::new(source, target));
            }
            graph
        })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn adjacency_is_symmetric(graph in arb_graph()) {
        for id in graph.vertex_ids() {
            for neighbor in graph.neighbors(id) {
                prop_assert!(
                    graph.neighbors(&neighbor).contains(id),
                    "{id} -> {neighbor} has no reverse entry"
                );
            }
        }
    }

    #[test]
    fn adjacent_pairs_are_sorted_and_unique(graph in arb_graph()) {
        let pairs = graph.adjacent_pairs();
        for (a, b) in &pairs {
            prop_assert!(a < b);
        }
        for window in pairs.windows(2) {
            prop_assert!(window[0] < window[1]);
        }
    }

    #[test]
    fn snapshot_roundtrip_preserves_state(graph in arb_graph()) {
        let snapshot = graph.to_snapshot();
        let restored = KnowledgeGraph::from_snapshot(snapshot.clone());

        prop_assert_eq!(restored.to_snapshot(), snapshot);
        prop_assert_eq!(restored.vertex_ids(), graph.vertex_ids());
        prop_assert_eq!(restored.adjacent_pairs(), graph.adjacent_pairs());
        prop_assert_eq!(restored.content_hash(), graph.content_hash());
    }

    #[test]
    fn json_roundtrip_preserves_state(graph in arb_graph()) {
        let json = graph.to_json().expect("serialize");
        let restored = KnowledgeGraph::from_json(&json).expect("deserialize");
        prop_assert_eq!(restored.to_snapshot(), graph.to_snapshot());
    }

    #[test]
    fn removing_every_edge_leaves_only_explicit_nodes(graph in arb_graph()) {
        let mut graph = graph;
        let ids: Vec<String> = graph.edges().iter().map(|e| e.id.clone()).collect();
        for id in ids {
            prop_assert!(graph.remove_edge(&id).is_some());
        }
        prop_assert_eq!(graph.edge_count(), 0);
        prop_assert_eq!(graph.vertex_count(), graph.node_count());
    }
}
