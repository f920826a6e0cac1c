//! Connected components of the canonical topology.

use petgraph::graph::NodeIndex;
use petgraph::unionfind::UnionFind;

use crate::graph::topology::Topology;

/// Connected components, each a list of vertex indices sorted ascending.
///
/// Components are ordered by their smallest vertex, which (since indices
/// follow id order) is the same as ordering by smallest id. Isolated
/// vertices form singleton components.
#[must_use]
pub fn connected_components(topo: &Topology) -> Vec<Vec<NodeIndex>> {
    let g = &topo.graph;
    let n = g.node_count();
    let mut uf = UnionFind::<usize>::new(n);

    for edge in g.raw_edges() {
        uf.union(edge.source().index(), edge.target().index());
    }

    // Index of the output component for each union-find root.
    let mut slot: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<NodeIndex>> = Vec::new();

    for idx in g.node_indices() {
        let root = uf.find(idx.index());
        let position = *slot[root].get_or_insert_with(|| {
            components.push(Vec::new());
            components.len() - 1
        });
        components[position].push(idx);
    }

    components
}

/// Number of vertices with no neighbours.
#[must_use]
pub fn isolated_vertex_count(topo: &Topology) -> usize {
    topo.graph
        .node_indices()
        .filter(|&idx| topo.graph.neighbors(idx).next().is_none())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use topograph_core::{KnowledgeEdge, KnowledgeGraph, KnowledgeNode};

    fn topo(nodes: &[&str], edges: &[(&str, &str)]) -> Topology {
        let mut kg = KnowledgeGraph::new();
        for id in nodes {
            kg.add_node(KnowledgeNode::new(*id, *id));
        }
        for (a, b) in edges {
            kg.add_edge(KnowledgeEdge::new(*a, *b));
        }
        Topology::from_graph(&kg)
    }

    #[test]
    fn empty_graph_has_no_components() {
        assert!(connected_components(&topo(&[], &[])).is_empty());
    }

    #[test]
    fn components_are_ordered_by_smallest_id() {
        let t = topo(&["lonely"], &[("d", "c"), ("b", "a"), ("e", "a")]);
        let groups: Vec<Vec<String>> = connected_components(&t)
            .iter()
            .map(|members| t.ids(members))
            .collect();
        assert_eq!(
            groups,
            vec![
                vec!["a".to_string(), "b".to_string(), "e".to_string()],
                vec!["c".to_string(), "d".to_string()],
                vec!["lonely".to_string()],
            ]
        );
    }

    #[test]
    fn isolated_vertices_are_counted() {
        let t = topo(&["x", "y"], &[("a", "b")]);
        assert_eq!(isolated_vertex_count(&t), 2);
    }
}
