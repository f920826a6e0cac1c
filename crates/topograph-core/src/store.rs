//! In-memory knowledge-graph store.
//!
//! # Overview
//!
//! [`KnowledgeGraph`] keeps nodes and relations in an undirected
//! [`petgraph`] arena. Each vertex carries its string id and, when the node
//! has been added explicitly, the [`KnowledgeNode`] payload. Because every
//! relation is one undirected edge, adjacency is symmetric by construction.
//!
//! ## Dangling endpoints
//!
//! An edge may reference an id that has no node. The edge is still recorded
//! and the missing endpoint becomes a *dangling vertex*: it takes part in
//! adjacency (and therefore in analysis) but is not returned by
//! [`KnowledgeGraph::node`] or [`KnowledgeGraph::nodes`]. A later
//! [`KnowledgeGraph::add_node`] with that id attaches the payload. Dangling
//! vertices left without edges are pruned.
//!
//! ## Snapshots
//!
//! [`KnowledgeGraph::to_snapshot`] emits nodes and edges sorted by id, so the
//! snapshot of a restored snapshot is identical to the original.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use tracing::{debug, instrument, warn};

use crate::eav::{SemanticTriple, extract_entities_from_eavs};
use crate::error::{TopographError, read_input};
use crate::model::{GraphSnapshot, KnowledgeEdge, KnowledgeNode};

/// Source tag attached to nodes and edges built from semantic triples.
pub const EAV_SOURCE: &str = "eav";

#[derive(Debug, Clone)]
struct Vertex {
    id: String,
    node: Option<KnowledgeNode>,
}

// ---------------------------------------------------------------------------
// KnowledgeGraph
// ---------------------------------------------------------------------------

/// Owned, caller-constructed knowledge graph.
///
/// Not internally synchronized; wrap in a `Mutex` when shared across threads.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: StableUnGraph<Vertex, KnowledgeEdge>,
    vertices: HashMap<String, NodeIndex>,
    edges: HashMap<String, EdgeIndex>,
}

impl KnowledgeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, overwriting any node with the same id.
    ///
    /// Incident edges are kept when a node is overwritten.
    pub fn add_node(&mut self, node: KnowledgeNode) {
        if let Some(&idx) = self.vertices.get(&node.id) {
            if let Some(vertex) = self.graph.node_weight_mut(idx) {
                vertex.node = Some(node);
            }
            return;
        }

        let id = node.id.clone();
        let idx = self.graph.add_node(Vertex {
            id: id.clone(),
            node: Some(node),
        });
        self.vertices.insert(id, idx);
    }

    /// Insert `edge`. An empty id becomes `"<source>-<target>"`; an existing
    /// id is replaced. Unknown endpoints become dangling vertices.
    pub fn add_edge(&mut self, edge: KnowledgeEdge) {
        let edge = edge.normalized();

        if let Some(old) = self.edges.remove(&edge.id) {
            let endpoints = self.graph.edge_endpoints(old);
            self.graph.remove_edge(old);
            if let Some((a, b)) = endpoints {
                self.prune_if_orphaned(a);
                self.prune_if_orphaned(b);
            }
        }

        let source = self.ensure_vertex(&edge.source, &edge.id);
        let target = self.ensure_vertex(&edge.target, &edge.id);
        let id = edge.id.clone();
        let idx = self.graph.add_edge(source, target, edge);
        self.edges.insert(id, idx);
    }

    /// Remove a node together with every incident edge.
    ///
    /// Returns `None` for unknown ids and for dangling vertices (which are not
    /// nodes and disappear on their own once their edges are removed).
    pub fn remove_node(&mut self, id: &str) -> Option<KnowledgeNode> {
        let idx = *self.vertices.get(id)?;
        self.graph.node_weight(idx)?.node.as_ref()?;

        let incident: Vec<(String, NodeIndex)> = self
            .graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (e.weight().id.clone(), other)
            })
            .collect();

        for (edge_id, _) in &incident {
            self.edges.remove(edge_id);
        }

        let vertex = self.graph.remove_node(idx)?;
        self.vertices.remove(id);

        for (_, other) in incident {
            if other != idx {
                self.prune_if_orphaned(other);
            }
        }

        vertex.node
    }

    /// Remove an edge by id. Dangling endpoints left without edges are pruned.
    pub fn remove_edge(&mut self, id: &str) -> Option<KnowledgeEdge> {
        let idx = self.edges.remove(id)?;
        let endpoints = self.graph.edge_endpoints(idx);
        let edge = self.graph.remove_edge(idx);
        if let Some((a, b)) = endpoints {
            self.prune_if_orphaned(a);
            self.prune_if_orphaned(b);
        }
        edge
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&KnowledgeNode> {
        let idx = self.vertices.get(id)?;
        self.graph.node_weight(*idx)?.node.as_ref()
    }

    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&KnowledgeEdge> {
        let idx = self.edges.get(id)?;
        self.graph.edge_weight(*idx)
    }

    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// All nodes, sorted by id. Dangling vertices are excluded.
    #[must_use]
    pub fn nodes(&self) -> Vec<&KnowledgeNode> {
        let mut nodes: Vec<&KnowledgeNode> =
            self.vertex_weights().filter_map(|v| v.node.as_ref()).collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// All edges, sorted by id.
    #[must_use]
    pub fn edges(&self) -> Vec<&KnowledgeEdge> {
        let mut edges: Vec<&KnowledgeEdge> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_weight(e))
            .collect();
        edges.sort_by(|a, b| a.id.cmp(&b.id));
        edges
    }

    /// Ids adjacent to `id`. Empty for isolated or unknown ids.
    #[must_use]
    pub fn neighbors(&self, id: &str) -> BTreeSet<String> {
        let Some(&idx) = self.vertices.get(id) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors(idx)
            .filter_map(|n| self.graph.node_weight(n))
            .map(|v| v.id.clone())
            .collect()
    }

    /// Number of distinct neighbours of `id`.
    #[must_use]
    pub fn degree(&self, id: &str) -> usize {
        self.neighbors(id).len()
    }

    /// Number of nodes (dangling vertices excluded).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.vertex_weights().filter(|v| v.node.is_some()).count()
    }

    /// Number of vertices, dangling ones included.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Every vertex id (nodes and dangling endpoints), sorted.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.vertex_weights().map(|v| v.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Distinct undirected vertex pairs `(a, b)` with `a < b`, sorted.
    ///
    /// Parallel edges collapse to one pair and self-loops are dropped: this
    /// is the simple-graph topology every analysis runs on.
    #[must_use]
    pub fn adjacent_pairs(&self) -> Vec<(&str, &str)> {
        let pairs: BTreeSet<(&str, &str)> = self
            .graph
            .edge_references()
            .filter_map(|e| {
                let a = self.graph.node_weight(e.source())?.id.as_str();
                let b = self.graph.node_weight(e.target())?.id.as_str();
                match a.cmp(b) {
                    std::cmp::Ordering::Less => Some((a, b)),
                    std::cmp::Ordering::Greater => Some((b, a)),
                    std::cmp::Ordering::Equal => None,
                }
            })
            .collect();
        pairs.into_iter().collect()
    }

    /// Drop all nodes, edges, and adjacency.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.vertices.clear();
        self.edges.clear();
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Full state as a snapshot; nodes and edges are sorted by id.
    #[must_use]
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().into_iter().cloned().collect(),
            edges: self.edges().into_iter().cloned().collect(),
        }
    }

    /// Replace all current state with `snapshot`. Nothing is merged.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.clear();
        for node in snapshot.nodes {
            self.add_node(node);
        }
        for edge in snapshot.edges {
            self.add_edge(edge);
        }
        debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "restored graph snapshot"
        );
    }

    #[must_use]
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        graph.restore(snapshot);
        graph
    }

    /// Serialize the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a metadata side-channel value cannot be encoded.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
    }

    /// Build a graph from snapshot JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::Snapshot`] when `json` is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, TopographError> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(TopographError::Snapshot)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// BLAKE3 hash of the topology (vertex ids and adjacent pairs).
    ///
    /// Derived results (centrality, holes) depend only on the topology, so an
    /// unchanged hash means cached results are still valid.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for id in self.vertex_ids() {
            hasher.update(id.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\x01");
        for (a, b) in self.adjacent_pairs() {
            hasher.update(a.as_bytes());
            hasher.update(b"\x00");
            hasher.update(b.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }

    // -----------------------------------------------------------------------
    // Construction from semantic triples
    // -----------------------------------------------------------------------

    /// Build a graph with one node per entity and one edge per triple.
    ///
    /// Nodes are typed `"entity"`, tagged with source `"eav"`, and carry the
    /// base weight of their strongest attribute category as importance.
    /// Edges run subject → object with the predicate's relation; repeated
    /// subject/object pairs collapse onto one edge id.
    #[must_use]
    #[instrument(skip(triples), fields(triples = triples.len()))]
    pub fn from_triples(triples: &[SemanticTriple]) -> Self {
        let mut graph = Self::new();

        let no_core: &[&str] = &[];
        for record in extract_entities_from_eavs(triples, "", no_core) {
            graph.add_node(
                KnowledgeNode::new(record.name.clone(), record.name)
                    .with_kind("entity")
                    .with_importance(record.attribute_category.base_weight())
                    .with_source(EAV_SOURCE),
            );
        }

        for triple in triples {
            let subject = triple.subject.label.trim();
            let object = triple.object.value.trim();
            if subject.is_empty() || object.is_empty() || subject == object {
                continue;
            }
            graph.add_edge(
                KnowledgeEdge::new(subject, object)
                    .with_relation(triple.predicate.relation.clone())
                    .with_source_tag(EAV_SOURCE),
            );
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built graph from semantic triples"
        );
        graph
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn vertex_weights(&self) -> impl Iterator<Item = &Vertex> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
    }

    fn ensure_vertex(&mut self, id: &str, edge_id: &str) -> NodeIndex {
        if let Some(&idx) = self.vertices.get(id) {
            return idx;
        }
        warn!(edge = edge_id, endpoint = id, "edge references unknown node");
        let idx = self.graph.add_node(Vertex {
            id: id.to_string(),
            node: None,
        });
        self.vertices.insert(id.to_string(), idx);
        idx
    }

    fn prune_if_orphaned(&mut self, idx: NodeIndex) {
        let orphaned = self
            .graph
            .node_weight(idx)
            .is_some_and(|v| v.node.is_none())
            && self.graph.edges(idx).next().is_none();

        if orphaned {
            if let Some(vertex) = self.graph.remove_node(idx) {
                self.vertices.remove(&vertex.id);
            }
        }
    }
}

/// Load a graph snapshot from a JSON file.
///
/// # Errors
///
/// Returns [`TopographError`] when the file is missing, unreadable, or not a
/// valid snapshot.
pub fn load_snapshot(path: &Path) -> Result<KnowledgeGraph, TopographError> {
    let content = read_input(path)?;
    KnowledgeGraph::from_json(&content)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeCategory;

    fn pairs_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        for id in ["A", "B", "C", "D"] {
            graph.add_node(KnowledgeNode::new(id, id));
        }
        graph.add_edge(KnowledgeEdge::new("A", "B"));
        graph.add_edge(KnowledgeEdge::new("C", "D"));
        graph
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_graph_has_no_state() {
        let graph = KnowledgeGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbors("A").is_empty());
    }

    #[test]
    fn add_node_overwrites_by_id() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(KnowledgeNode::new("A", "first"));
        graph.add_edge(KnowledgeEdge::new("A", "B"));
        graph.add_node(KnowledgeNode::new("A", "second"));

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("A").map(|n| n.term.as_str()), Some("second"));
        assert_eq!(graph.neighbors("A"), set(&["B"]), "edges survive overwrite");
    }

    #[test]
    fn adjacency_is_symmetric() {
        let graph = pairs_graph();
        assert_eq!(graph.neighbors("A"), set(&["B"]));
        assert_eq!(graph.neighbors("B"), set(&["A"]));
        assert_eq!(graph.neighbors("C"), set(&["D"]));
        assert_eq!(graph.degree("D"), 1);
    }

    #[test]
    fn edge_to_unknown_node_creates_dangling_vertex() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(KnowledgeNode::new("A", "A"));
        graph.add_edge(KnowledgeEdge::new("A", "ghost"));

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.vertex_count(), 2);
        assert!(!graph.contains_node("ghost"));
        assert_eq!(graph.neighbors("ghost"), set(&["A"]));

        graph.add_node(KnowledgeNode::new("ghost", "Ghost"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn default_edge_id_is_source_dash_target() {
        let mut graph = KnowledgeGraph::new();
        graph.add_edge(KnowledgeEdge::new("x", "y").with_id(""));
        assert!(graph.edge("x-y").is_some());
    }

    #[test]
    fn readding_edge_id_replaces_it() {
        let mut graph = pairs_graph();
        graph.add_edge(KnowledgeEdge::new("A", "C").with_id("A-B"));

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors("A"), set(&["C"]));
        assert!(graph.neighbors("B").is_empty());
    }

    #[test]
    fn remove_edge_prunes_orphaned_dangling_vertices() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(KnowledgeNode::new("A", "A"));
        graph.add_edge(KnowledgeEdge::new("A", "ghost"));

        let removed = graph.remove_edge("A-ghost").expect("edge exists");
        assert_eq!(removed.target, "ghost");
        assert_eq!(graph.vertex_count(), 1);
        assert!(graph.neighbors("A").is_empty());
        assert!(graph.remove_edge("A-ghost").is_none());
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut graph = pairs_graph();
        graph.add_edge(KnowledgeEdge::new("B", "C"));

        let removed = graph.remove_node("B").expect("node exists");
        assert_eq!(removed.id, "B");
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.neighbors("A").is_empty());
        assert_eq!(graph.neighbors("C"), set(&["D"]));
        assert!(graph.edge("A-B").is_none());
        assert!(graph.remove_node("B").is_none());
    }

    #[test]
    fn remove_node_ignores_dangling_vertices() {
        let mut graph = KnowledgeGraph::new();
        graph.add_edge(KnowledgeEdge::new("A", "B"));
        assert!(graph.remove_node("A").is_none());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn adjacent_pairs_collapse_parallel_edges_and_drop_loops() {
        let mut graph = pairs_graph();
        graph.add_edge(KnowledgeEdge::new("B", "A"));
        graph.add_edge(KnowledgeEdge::new("A", "A"));

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.adjacent_pairs(), vec![("A", "B"), ("C", "D")]);
    }

    #[test]
    fn snapshot_roundtrip_is_exact() {
        let mut graph = pairs_graph();
        graph.add_edge(KnowledgeEdge::new("B", "ghost").with_relation("mentions"));

        let snapshot = graph.to_snapshot();
        let restored = KnowledgeGraph::from_snapshot(snapshot.clone());

        assert_eq!(restored.to_snapshot(), snapshot);
        assert_eq!(restored.content_hash(), graph.content_hash());
        assert_eq!(restored.vertex_ids(), graph.vertex_ids());
    }

    #[test]
    fn restore_replaces_existing_state() {
        let mut graph = pairs_graph();
        let mut other = KnowledgeGraph::new();
        other.add_node(KnowledgeNode::new("Z", "Z"));

        graph.restore(other.to_snapshot());
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.contains_node("A"));
    }

    #[test]
    fn json_roundtrip_and_shape() {
        let graph = pairs_graph();
        let json = graph.to_json().expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["edges"][0]["id"], "A-B");

        let restored = KnowledgeGraph::from_json(&json).expect("parse");
        assert_eq!(restored.to_snapshot(), graph.to_snapshot());
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        let err = KnowledgeGraph::from_json("{\"nodes\": 3}").expect_err("must fail");
        assert!(matches!(err, TopographError::Snapshot(_)));
    }

    #[test]
    fn clear_empties_everything() {
        let mut graph = pairs_graph();
        graph.clear();
        assert!(graph.is_empty());
        assert!(graph.edges().is_empty());
        assert!(graph.neighbors("A").is_empty());
        assert_eq!(graph.to_snapshot(), GraphSnapshot::default());
    }

    #[test]
    fn content_hash_tracks_topology_only() {
        let mut graph = pairs_graph();
        let before = graph.content_hash();

        graph.add_node(KnowledgeNode::new("A", "renamed").with_definition("changed"));
        assert_eq!(graph.content_hash(), before, "payload edits keep the hash");

        graph.add_edge(KnowledgeEdge::new("B", "C"));
        assert_ne!(graph.content_hash(), before, "new adjacency changes the hash");
    }

    #[test]
    fn from_triples_builds_entities_and_relations() {
        let triples = vec![
            SemanticTriple::new("Solar Panel", "efficiency", "22%")
                .with_category(AttributeCategory::Unique),
            SemanticTriple::new("Solar Panel", "made_of", "Silicon"),
            SemanticTriple::new("Inverter", "converts", "Solar Panel"),
        ];
        let graph = KnowledgeGraph::from_triples(&triples);

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(
            graph.neighbors("Solar Panel"),
            set(&["22%", "Inverter", "Silicon"])
        );

        let panel = graph.node("Solar Panel").expect("panel node");
        assert_eq!(panel.kind, "entity");
        assert_eq!(panel.metadata.source.as_deref(), Some(EAV_SOURCE));
        assert_eq!(panel.metadata.importance, Some(0.9));

        let edge = graph.edge("Solar Panel-Silicon").expect("edge");
        assert_eq!(edge.relation, "made_of");
    }

    #[test]
    fn graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KnowledgeGraph>();
    }
}
