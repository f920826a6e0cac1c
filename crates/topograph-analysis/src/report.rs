//! Summary statistics and the combined analysis report.
//!
//! # Statistics Provided
//!
//! - **node_count**: nodes with a payload (dangling endpoints excluded).
//! - **vertex_count**: every vertex the analyses see, dangling ones included.
//! - **edge_count**: relations stored, parallel ones included.
//! - **link_count**: distinct undirected vertex pairs (self-loops dropped).
//! - **density**: `2 * link_count / (vertex_count * (vertex_count - 1))`;
//!   0 for graphs with fewer than two vertices.
//! - **component_count** / **isolated_vertex_count**: how fragmented the
//!   graph is.
//! - **max_degree**: most distinct neighbours on one vertex.

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use topograph_core::KnowledgeGraph;
use tracing::instrument;

use crate::graph::topology::Topology;
use crate::holes::{HoleConfig, StructuralHole, holes_in_topology};
use crate::metrics::betweenness::{normalize_scores, raw_scores};
use crate::metrics::components::{connected_components, isolated_vertex_count};

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub link_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub isolated_vertex_count: usize,
    pub max_degree: usize,
    /// BLAKE3 topology hash; unchanged hash means unchanged analysis results.
    pub content_hash: String,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(kg: &KnowledgeGraph) -> Self {
        Self::from_topology(kg, &Topology::from_graph(kg))
    }

    fn from_topology(kg: &KnowledgeGraph, topo: &Topology) -> Self {
        let vertex_count = topo.node_count();
        let link_count = topo.edge_count();

        Self {
            node_count: kg.node_count(),
            vertex_count,
            edge_count: kg.edge_count(),
            link_count,
            density: compute_density(vertex_count, link_count),
            component_count: connected_components(topo).len(),
            isolated_vertex_count: isolated_vertex_count(topo),
            max_degree: topo
                .graph
                .node_indices()
                .map(|idx| topo.degree(idx))
                .max()
                .unwrap_or(0),
            content_hash: topo.content_hash.clone(),
        }
    }

    /// `true` when every vertex can reach every other.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.component_count <= 1
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(vertex_count: usize, link_count: usize) -> f64 {
    if vertex_count < 2 {
        return 0.0_f64;
    }
    let max_links = (vertex_count * (vertex_count - 1)) as f64 / 2.0;
    link_count as f64 / max_links
}

// ---------------------------------------------------------------------------
// GraphReport
// ---------------------------------------------------------------------------

/// Stats, centrality, and holes computed from one topology snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    pub stats: GraphStats,
    pub centrality: BTreeMap<String, f64>,
    pub holes: Vec<StructuralHole>,
}

impl GraphReport {
    #[must_use]
    #[instrument(skip(kg))]
    pub fn build(kg: &KnowledgeGraph, config: &HoleConfig) -> Self {
        let topo = Topology::from_graph(kg);

        let mut scores = raw_scores(&topo);
        normalize_scores(&mut scores);
        let centrality = topo
            .graph
            .node_indices()
            .map(|idx| (topo.id(idx).to_string(), scores[idx.index()]))
            .collect();

        Self {
            stats: GraphStats::from_topology(kg, &topo),
            centrality,
            holes: holes_in_topology(&topo, config),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use topograph_core::{KnowledgeEdge, KnowledgeNode};

    #[test]
    fn empty_graph_stats() {
        let stats = GraphStats::from_graph(&KnowledgeGraph::new());
        assert_eq!(stats.vertex_count, 0);
        assert_eq!(stats.component_count, 0);
        assert!(stats.density.abs() < 1e-12);
        assert_eq!(stats.max_degree, 0);
        assert!(stats.is_connected());
    }

    #[test]
    fn stats_count_dangling_vertices_and_parallel_edges() {
        let mut kg = KnowledgeGraph::new();
        kg.add_node(KnowledgeNode::new("A", "A"));
        kg.add_node(KnowledgeNode::new("lonely", "Lonely"));
        kg.add_edge(KnowledgeEdge::new("A", "B"));
        kg.add_edge(KnowledgeEdge::new("B", "A"));

        let stats = GraphStats::from_graph(&kg);
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.vertex_count, 3);
        assert_eq!(stats.edge_count, 2);
        assert_eq!(stats.link_count, 1);
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.isolated_vertex_count, 1);
        assert_eq!(stats.max_degree, 1);
        // 1 of 3 possible links.
        assert!((stats.density - 1.0 / 3.0).abs() < 1e-12);
        assert!(!stats.is_connected());
    }

    #[test]
    fn report_bundles_all_results() {
        let mut kg = KnowledgeGraph::new();
        kg.add_edge(KnowledgeEdge::new("A", "B"));
        kg.add_edge(KnowledgeEdge::new("B", "C"));
        kg.add_edge(KnowledgeEdge::new("X", "Y"));

        let report = GraphReport::build(&kg, &HoleConfig::default());
        assert_eq!(report.stats.component_count, 2);
        assert!((report.centrality["B"] - 1.0).abs() < 1e-12);
        assert_eq!(report.holes.len(), 1);
        assert_eq!(report.holes[0].cluster_a, vec!["A", "B", "C"]);
        assert_eq!(report.stats.content_hash, kg.content_hash());
    }
}
