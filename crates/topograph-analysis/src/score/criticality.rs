//! Entity criticality scoring.
//!
//! An entity's criticality combines four additive components:
//!
//! `score = min(1, round2(base + core_section + co_occurrence + bridge))`
//!
//! - `base`: the weight of the entity's strongest attribute category
//!   (UNIQUE 0.9, ROOT 0.8, RARE 0.6, COMMON 0.4);
//! - `core_section`: 0.2 when the entity appears in a core section;
//! - `co_occurrence`: 0.1 per extra topic, capped at 0.3;
//! - `bridge`: normalized betweenness times 0.3.
//!
//! The central entity always scores exactly 1.0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use topograph_core::{AttributeCategory, EntityRecord};
use tracing::{debug, instrument};

/// Scores at or above this are critical.
pub const CRITICALITY_THRESHOLD: f64 = 0.7;

const CORE_SECTION_BONUS: f64 = 0.2;
const CO_OCCURRENCE_STEP: f64 = 0.1;
const CO_OCCURRENCE_CAP: f64 = 0.3;
const BRIDGE_WEIGHT: f64 = 0.3;

/// Flat scoring input for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCriticalityInput {
    pub entity_name: String,
    pub is_central_entity: bool,
    pub attribute_category: AttributeCategory,
    pub is_core_section_entity: bool,
    /// Distinct topics the entity appears in; 0 is treated as 1.
    pub topic_count: u32,
    /// Normalized betweenness in `[0, 1]`; other values are clamped.
    pub betweenness_centrality: f64,
}

/// The four additive components behind a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalityBreakdown {
    pub base_weight: f64,
    pub core_section_bonus: f64,
    pub co_occurrence_bonus: f64,
    pub bridge_bonus: f64,
}

impl CriticalityBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.base_weight + self.core_section_bonus + self.co_occurrence_bonus + self.bridge_bonus
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityCriticalityResult {
    pub entity_name: String,
    /// In `[0, 1]`, rounded to two decimals.
    pub score: f64,
    pub is_critical: bool,
    pub breakdown: CriticalityBreakdown,
}

/// Score one entity.
#[must_use]
pub fn calculate_criticality_score(input: &EntityCriticalityInput) -> EntityCriticalityResult {
    if input.is_central_entity {
        return EntityCriticalityResult {
            entity_name: input.entity_name.clone(),
            score: 1.0,
            is_critical: true,
            breakdown: CriticalityBreakdown {
                base_weight: 1.0,
                ..CriticalityBreakdown::default()
            },
        };
    }

    let extra_topics = input.topic_count.max(1) - 1;
    let breakdown = CriticalityBreakdown {
        base_weight: input.attribute_category.base_weight(),
        core_section_bonus: if input.is_core_section_entity {
            CORE_SECTION_BONUS
        } else {
            0.0
        },
        co_occurrence_bonus: (CO_OCCURRENCE_STEP * f64::from(extra_topics)).min(CO_OCCURRENCE_CAP),
        bridge_bonus: normalize_unit(input.betweenness_centrality) * BRIDGE_WEIGHT,
    };

    let score = round2(breakdown.total()).min(1.0);

    EntityCriticalityResult {
        entity_name: input.entity_name.clone(),
        score,
        is_critical: score >= CRITICALITY_THRESHOLD,
        breakdown,
    }
}

/// Score every input, preserving order.
#[must_use]
pub fn batch_calculate_criticality(inputs: &[EntityCriticalityInput]) -> Vec<EntityCriticalityResult> {
    inputs.iter().map(calculate_criticality_score).collect()
}

/// Keep only critical results, preserving order.
#[must_use]
pub fn filter_critical_entities(results: &[EntityCriticalityResult]) -> Vec<EntityCriticalityResult> {
    results.iter().filter(|r| r.is_critical).cloned().collect()
}

/// A new vector sorted by score, highest first. Equal scores keep their
/// input order; `results` is left untouched.
#[must_use]
pub fn sort_by_criticality(results: &[EntityCriticalityResult]) -> Vec<EntityCriticalityResult> {
    let mut sorted = results.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
    sorted
}

/// Scoring input for an extracted entity with the given betweenness.
#[must_use]
pub fn criticality_input(record: &EntityRecord, betweenness: f64) -> EntityCriticalityInput {
    EntityCriticalityInput {
        entity_name: record.name.clone(),
        is_central_entity: record.is_central_entity,
        attribute_category: record.attribute_category,
        is_core_section_entity: record.is_core_section_entity,
        topic_count: record.topic_count,
        betweenness_centrality: betweenness,
    }
}

/// Score extracted entities against a centrality map. Entities missing from
/// `centrality` get a betweenness of 0. Output follows `records` order.
#[must_use]
#[instrument(skip_all, fields(entities = records.len()))]
pub fn score_entities(
    records: &[EntityRecord],
    centrality: &BTreeMap<String, f64>,
) -> Vec<EntityCriticalityResult> {
    let results: Vec<EntityCriticalityResult> = records
        .iter()
        .map(|record| {
            let bc = centrality.get(&record.name).copied().unwrap_or(0.0);
            calculate_criticality_score(&criticality_input(record, bc))
        })
        .collect();

    debug!(
        critical = results.iter().filter(|r| r.is_critical).count(),
        "scored entities"
    );
    results
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn normalize_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    value.clamp(0.0, 1.0)
}
