//! Criticality scoring rules, end to end from semantic triples.
//!
//! Covers the scoring rule table, the batch/filter/sort helpers, and the
//! full triples → graph → centrality → scores flow.

use topograph_analysis::betweenness_centrality;
use topograph_analysis::score::{
    CRITICALITY_THRESHOLD, EntityCriticalityInput, batch_calculate_criticality,
    calculate_criticality_score, filter_critical_entities, score_entities, sort_by_criticality,
};
use topograph_core::{AttributeCategory, KnowledgeGraph, SemanticTriple, extract_entities_from_eavs};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn assert_approx_eq(actual: f64, expected: f64) {
    let tolerance = 1e-10;
    assert!(
        (actual - expected).abs() <= tolerance,
        "actual ({actual}) != expected ({expected})"
    );
}

fn make_input(
    name: &str,
    category: AttributeCategory,
    core: bool,
    topics: u32,
    betweenness: f64,
) -> EntityCriticalityInput {
    EntityCriticalityInput {
        entity_name: name.to_string(),
        is_central_entity: false,
        attribute_category: category,
        is_core_section_entity: core,
        topic_count: topics,
        betweenness_centrality: betweenness,
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[test]
fn central_entity_always_scores_one() {
    for category in AttributeCategory::ALL {
        for topics in [0, 1, 7] {
            let mut input = make_input("Solar Energy", category, topics > 1, topics, 0.3);
            input.is_central_entity = true;
            assert_approx_eq(calculate_criticality_score(&input).score, 1.0);
        }
    }
}

#[test]
fn unique_single_topic_scores_point_nine() {
    let r = calculate_criticality_score(&make_input("Panel", AttributeCategory::Unique, false, 1, 0.0));
    assert_approx_eq(r.score, 0.9);
    assert!(r.is_critical);
}

#[test]
fn common_core_entity_breakdown() {
    let r = calculate_criticality_score(&make_input("Price", AttributeCategory::Common, true, 3, 0.5));
    assert_approx_eq(r.breakdown.base_weight, 0.4);
    assert_approx_eq(r.breakdown.core_section_bonus, 0.2);
    assert_approx_eq(r.breakdown.co_occurrence_bonus, 0.2);
    assert_approx_eq(r.breakdown.bridge_bonus, 0.15);
    assert_approx_eq(r.score, 0.95);
    assert!(r.is_critical);
}

#[test]
fn scores_are_rounded_to_two_decimals() {
    let r = calculate_criticality_score(&make_input("x", AttributeCategory::Rare, false, 1, 0.123));
    // 0.6 + 0.0369 = 0.6369
    assert_approx_eq(r.score, 0.64);
    assert!(!r.is_critical);
    assert!(r.score < CRITICALITY_THRESHOLD);
}

// ---------------------------------------------------------------------------
// Helpers over result lists
// ---------------------------------------------------------------------------

#[test]
fn batch_filter_and_sort() {
    let inputs = vec![
        make_input("low", AttributeCategory::Common, false, 1, 0.0),
        make_input("root", AttributeCategory::Root, false, 1, 0.0),
        make_input("unique", AttributeCategory::Unique, false, 2, 0.0),
    ];
    let results = batch_calculate_criticality(&inputs);
    let names: Vec<&str> = results.iter().map(|r| r.entity_name.as_str()).collect();
    assert_eq!(names, vec!["low", "root", "unique"]);

    let critical = filter_critical_entities(&results);
    assert_eq!(critical.len(), 2);

    let before = results.clone();
    let sorted = sort_by_criticality(&results);
    assert_eq!(results, before, "input must not be reordered");
    let names: Vec<&str> = sorted.iter().map(|r| r.entity_name.as_str()).collect();
    assert_eq!(names, vec!["unique", "root", "low"]);
}

// ---------------------------------------------------------------------------
// Full data flow
// ---------------------------------------------------------------------------

#[test]
fn triples_to_scores() {
    let triples = vec![
        SemanticTriple::new("Solar Energy", "uses", "Solar Panel").with_category(AttributeCategory::Root),
        SemanticTriple::new("Solar Panel", "made_of", "Silicon").with_category(AttributeCategory::Unique),
        SemanticTriple::new("Inverter", "converts", "Solar Energy").with_category(AttributeCategory::Rare),
        SemanticTriple::new("Battery", "stores", "Solar Energy"),
    ];

    let graph = KnowledgeGraph::from_triples(&triples);
    let centrality = betweenness_centrality(&graph);
    let records = extract_entities_from_eavs(&triples, "solar energy", &["Solar Panel"]);
    let results = sort_by_criticality(&score_entities(&records, &centrality));

    // The central entity is pinned to 1.0 and sorts first.
    assert_eq!(results[0].entity_name, "Solar Energy");
    assert_approx_eq(results[0].score, 1.0);

    // Solar Panel: UNIQUE 0.9 + core 0.2 + one extra topic 0.1 + bridge, capped.
    let panel = results
        .iter()
        .find(|r| r.entity_name == "Solar Panel")
        .expect("panel scored");
    assert_approx_eq(panel.score, 1.0);

    // Battery: a COMMON leaf that appears in a single topic.
    let battery = results
        .iter()
        .find(|r| r.entity_name == "Battery")
        .expect("battery scored");
    assert_approx_eq(battery.breakdown.bridge_bonus, 0.0);
    assert_approx_eq(battery.score, 0.4);
    assert_eq!(results.len(), 5);
}
