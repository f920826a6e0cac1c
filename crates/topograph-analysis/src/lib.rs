#![forbid(unsafe_code)]
//! topograph-analysis library.
//!
//! # Conventions
//!
//! - **Errors**: Analyses are total functions. Degenerate graphs yield empty
//!   or zero results, never errors or NaN.
//! - **Determinism**: Every analysis runs on [`graph::Topology`], so results
//!   depend only on graph contents, not on mutation history.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

use std::collections::BTreeMap;

use topograph_core::KnowledgeGraph;

pub mod graph;
pub mod holes;
pub mod metrics;
pub mod report;
pub mod score;

pub use holes::{
    DEFAULT_HOLE_THRESHOLD, HoleConfig, HolePriority, StructuralHole, identify_structural_holes,
    identify_structural_holes_with,
};
pub use metrics::betweenness::{betweenness_centrality, normalize_by_max, raw_betweenness};
pub use report::{GraphReport, GraphStats};

/// Method-call forms of the graph analyses.
pub trait GraphAnalysis {
    /// Normalized betweenness per vertex; see [`betweenness_centrality`].
    fn calculate_betweenness_centrality(&self) -> BTreeMap<String, f64>;

    /// Structural holes below `threshold`; see [`identify_structural_holes`].
    fn identify_structural_holes(&self, threshold: f64) -> Vec<StructuralHole>;

    /// Stats, centrality, and holes in one pass.
    fn report(&self, config: &HoleConfig) -> GraphReport;
}

impl GraphAnalysis for KnowledgeGraph {
    fn calculate_betweenness_centrality(&self) -> BTreeMap<String, f64> {
        betweenness_centrality(self)
    }

    fn identify_structural_holes(&self, threshold: f64) -> Vec<StructuralHole> {
        holes::identify_structural_holes(self, threshold)
    }

    fn report(&self, config: &HoleConfig) -> GraphReport {
        GraphReport::build(self, config)
    }
}
