//! Canonical undirected view of a [`KnowledgeGraph`].
//!
//! # Overview
//!
//! Every analysis runs on a [`Topology`] rather than on the store itself.
//! The view is a simple undirected graph:
//!
//! - vertex `i` is the `i`-th vertex id in sorted order (dangling endpoints
//!   included), so index order and id order agree;
//! - parallel relations collapse to one edge and self-loops are dropped;
//! - edges are inserted in sorted `(a, b)` order.
//!
//! Two stores with the same vertex ids and adjacency therefore produce the
//! same view, whatever order nodes and edges were added or removed in.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use topograph_core::KnowledgeGraph;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Topology
// ---------------------------------------------------------------------------

/// Sorted, de-duplicated simple-graph projection of a knowledge graph.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Undirected graph whose node weights are vertex ids.
    pub graph: UnGraph<String, ()>,
    /// Mapping from vertex id to `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 hash of the topology, as reported by the store.
    pub content_hash: String,
}

impl Topology {
    /// Build the canonical view of `kg`.
    #[must_use]
    #[instrument(skip(kg))]
    pub fn from_graph(kg: &KnowledgeGraph) -> Self {
        let ids = kg.vertex_ids();
        let pairs = kg.adjacent_pairs();

        let mut graph = UnGraph::<String, ()>::with_capacity(ids.len(), pairs.len());
        let mut node_map = HashMap::with_capacity(ids.len());

        for id in ids {
            let idx = graph.add_node(id.to_string());
            node_map.insert(id.to_string(), idx);
        }

        for (a, b) in pairs {
            if let (Some(&ia), Some(&ib)) = (node_map.get(a), node_map.get(b)) {
                graph.add_edge(ia, ib, ());
            }
        }

        debug!(
            vertices = graph.node_count(),
            edges = graph.edge_count(),
            "built canonical topology"
        );

        Self {
            graph,
            node_map,
            content_hash: kg.content_hash(),
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Vertex id at `idx`. Empty for an index outside the view.
    #[must_use]
    pub fn id(&self, idx: NodeIndex) -> &str {
        self.graph.node_weight(idx).map_or("", String::as_str)
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Number of distinct neighbours of `idx`.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors(idx).count()
    }

    /// Vertex ids for `members`, in the given order.
    #[must_use]
    pub fn ids(&self, members: &[NodeIndex]) -> Vec<String> {
        members.iter().map(|&idx| self.id(idx).to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
