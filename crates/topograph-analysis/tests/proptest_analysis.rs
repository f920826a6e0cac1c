use proptest::prelude::*;
use topograph_analysis::{
    GraphAnalysis, HolePriority, betweenness_centrality, identify_structural_holes,
};
use topograph_core::{KnowledgeEdge, KnowledgeGraph};

fn arb_graph() -> impl Strategy<Value = KnowledgeGraph> {
    prop::collection::vec((0u8..10, 0u8..10), 0..24).prop_map(|edges| {
        let mut graph = KnowledgeGraph::new();
        for (a, b) in edges {
            graph.add_edge(KnowledgeEdge::new(format!("v{a}"), format!("v{b}")));
        }
        graph
    })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn centrality_is_bounded_with_unit_max(graph in arb_graph()) {
        let bc = betweenness_centrality(&graph);
        prop_assert_eq!(bc.len(), graph.vertex_count());

        let mut max = 0.0_f64;
        for (id, value) in &bc {
            prop_assert!(value.is_finite(), "{} is not finite", id);
            prop_assert!((0.0..=1.0).contains(value), "{} = {} out of range", id, value);
            max = max.max(*value);
        }
        prop_assert!(max.abs() < 1e-12 || (max - 1.0).abs() < 1e-12, "max = {}", max);
    }

    #[test]
    fn hole_strengths_stay_below_threshold(graph in arb_graph(), threshold in 0.01f64..1.0) {
        for hole in identify_structural_holes(&graph, threshold) {
            prop_assert!(hole.connection_strength >= 0.0);
            prop_assert!(hole.connection_strength < threshold || hole.priority == HolePriority::Critical);
            prop_assert!(hole.bridge_candidates.len() <= 5);
            prop_assert!(!hole.cluster_a.is_empty() && !hole.cluster_b.is_empty());
            prop_assert_eq!(hole.priority, HolePriority::from_strength(hole.connection_strength));
        }
    }

    #[test]
    fn snapshot_roundtrip_reproduces_analysis(graph in arb_graph()) {
        let restored = KnowledgeGraph::from_snapshot(graph.to_snapshot());
        prop_assert_eq!(
            restored.calculate_betweenness_centrality(),
            graph.calculate_betweenness_centrality()
        );
        prop_assert_eq!(
            restored.identify_structural_holes(0.5),
            graph.identify_structural_holes(0.5)
        );
    }
}
