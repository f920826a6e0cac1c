#![no_main]

use libfuzzer_sys::fuzz_target;
use topograph_core::eav::parse_triples;
use topograph_core::{KnowledgeGraph, extract_entities_from_eavs};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(triples) = parse_triples(text) else {
        return;
    };

    let no_core: &[&str] = &[];
    let records = extract_entities_from_eavs(&triples, "", no_core);
    let graph = KnowledgeGraph::from_triples(&triples);
    assert_eq!(records.len(), graph.node_count());
});
