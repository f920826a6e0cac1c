//! Entity scoring.
//!
//! [`criticality`] turns extracted entity records plus a centrality map into
//! bounded importance scores, with batch, filter, and sort helpers.

pub mod criticality;

pub use criticality::{
    CRITICALITY_THRESHOLD, CriticalityBreakdown, EntityCriticalityInput, EntityCriticalityResult,
    batch_calculate_criticality, calculate_criticality_score, criticality_input,
    filter_critical_entities, score_entities, sort_by_criticality,
};
