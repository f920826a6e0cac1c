//! Bridge edges and the bipartitions they induce.
//!
//! A bridge is an edge whose removal disconnects its component. Bridges are
//! found with Tarjan's lowlink DFS, run iteratively so deep chains cannot
//! overflow the stack.

#![allow(clippy::module_name_repetitions)]

use fixedbitset::FixedBitSet;
use petgraph::graph::{Neighbors, NodeIndex};

use crate::graph::topology::Topology;

/// Every bridge edge of `topo`, as `(a, b)` with `a < b`, sorted.
#[must_use]
pub fn find_bridges(topo: &Topology) -> Vec<(NodeIndex, NodeIndex)> {
    let g = &topo.graph;
    let n = g.node_count();

    let mut visited = FixedBitSet::with_capacity(n);
    let mut disc: Vec<usize> = vec![0; n];
    let mut low: Vec<usize> = vec![0; n];
    let mut timer = 0usize;
    let mut bridges = Vec::new();

    // (vertex, DFS parent, remaining neighbours)
    let mut stack: Vec<(NodeIndex, Option<NodeIndex>, Neighbors<'_, ()>)> = Vec::new();

    for root in g.node_indices() {
        if visited.put(root.index()) {
            continue;
        }
        disc[root.index()] = timer;
        low[root.index()] = timer;
        timer += 1;
        stack.push((root, None, g.neighbors(root)));

        while let Some(frame) = stack.last_mut() {
            let (v, parent) = (frame.0, frame.1);
            if let Some(w) = frame.2.next() {
                if Some(w) == parent {
                    continue;
                }
                if visited.put(w.index()) {
                    low[v.index()] = low[v.index()].min(disc[w.index()]);
                } else {
                    disc[w.index()] = timer;
                    low[w.index()] = timer;
                    timer += 1;
                    stack.push((w, Some(v), g.neighbors(w)));
                }
            } else {
                stack.pop();
                if let Some(p) = parent {
                    low[p.index()] = low[p.index()].min(low[v.index()]);
                    if low[v.index()] > disc[p.index()] {
                        bridges.push(if p < v { (p, v) } else { (v, p) });
                    }
                }
            }
        }
    }

    bridges.sort_unstable();
    bridges
}

/// The vertices reachable from `start` without crossing the edge `cut`,
/// sorted by index.
#[must_use]
pub fn side_of_cut(topo: &Topology, cut: (NodeIndex, NodeIndex), start: NodeIndex) -> Vec<NodeIndex> {
    let g = &topo.graph;
    let mut seen = FixedBitSet::with_capacity(g.node_count());
    seen.insert(start.index());
    let mut stack = vec![start];
    let mut side = Vec::new();

    while let Some(v) = stack.pop() {
        side.push(v);
        for w in g.neighbors(v) {
            let crosses = (v, w) == cut || (w, v) == cut;
            if !crosses && !seen.put(w.index()) {
                stack.push(w);
            }
        }
    }

    side.sort_unstable();
    side
}

#[cfg(test)]
mod tests {
    use super::*;
    use topograph_core::{KnowledgeEdge, KnowledgeGraph};

    fn topo(edges: &[(&str, &str)]) -> Topology {
        let mut kg = KnowledgeGraph::new();
        for (a, b) in edges {
            kg.add_edge(KnowledgeEdge::new(*a, *b));
        }
        Topology::from_graph(&kg)
    }

    fn named(t: &Topology, bridges: &[(NodeIndex, NodeIndex)]) -> Vec<(String, String)> {
        bridges
            .iter()
            .map(|&(a, b)| (t.id(a).to_string(), t.id(b).to_string()))
            .collect()
    }

    #[test]
    fn path_edges_are_all_bridges() {
        let t = topo(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let bridges = find_bridges(&t);
        assert_eq!(
            named(&t, &bridges),
            vec![
                ("A".to_string(), "B".to_string()),
                ("B".to_string(), "C".to_string()),
                ("C".to_string(), "D".to_string()),
            ]
        );
    }

    #[test]
    fn cycle_has_no_bridges() {
        let t = topo(&[("A", "B"), ("B", "C"), ("C", "A")]);
        assert!(find_bridges(&t).is_empty());
    }

    #[test]
    fn triangles_joined_by_one_edge() {
        let t = topo(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("C", "D"),
            ("D", "E"),
            ("E", "F"),
            ("F", "D"),
        ]);
        let bridges = find_bridges(&t);
        assert_eq!(named(&t, &bridges), vec![("C".to_string(), "D".to_string())]);

        let (c, d) = bridges[0];
        assert_eq!(t.ids(&side_of_cut(&t, bridges[0], c)), vec!["A", "B", "C"]);
        assert_eq!(t.ids(&side_of_cut(&t, bridges[0], d)), vec!["D", "E", "F"]);
    }

    #[test]
    fn bridges_found_in_every_component() {
        let t = topo(&[("A", "B"), ("X", "Y"), ("Y", "Z"), ("Z", "X")]);
        let bridges = find_bridges(&t);
        assert_eq!(named(&t, &bridges), vec![("A".to_string(), "B".to_string())]);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let ids: Vec<String> = (0..20_000).map(|i| format!("n{i:05}")).collect();
        let mut kg = KnowledgeGraph::new();
        for pair in ids.windows(2) {
            kg.add_edge(KnowledgeEdge::new(pair[0].clone(), pair[1].clone()));
        }
        let t = Topology::from_graph(&kg);
        assert_eq!(find_bridges(&t).len(), ids.len() - 1);
    }
}
