#![no_main]

use libfuzzer_sys::fuzz_target;
use topograph_analysis::{HoleConfig, betweenness_centrality, identify_structural_holes_with};
use topograph_core::KnowledgeGraph;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(graph) = KnowledgeGraph::from_json(text) else {
        return;
    };

    let scores = betweenness_centrality(&graph);
    assert!(scores.values().all(|s| (0.0..=1.0).contains(s)));

    let config = HoleConfig::with_threshold(0.5);
    for hole in identify_structural_holes_with(&graph, &config) {
        assert!(hole.connection_strength >= 0.0 && hole.connection_strength < 0.5);
    }

    // Snapshots must survive a round trip unchanged.
    let json = graph.to_json().expect("serialize loaded graph");
    let again = KnowledgeGraph::from_json(&json).expect("reload own snapshot");
    assert_eq!(again.content_hash(), graph.content_hash());
});
