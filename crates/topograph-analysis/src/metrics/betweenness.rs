//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often an entity lies on shortest
//! paths between other pairs of entities. High-betweenness entities bridge
//! otherwise separate topics.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs, run on the undirected
//! [`Topology`]:
//!
//! 1. For each source vertex `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest first).
//! 3. Sum across sources and halve, since every unordered pair is visited
//!    from both ends.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! [`betweenness_centrality`] divides every raw score by the largest raw
//! score in the graph, so the most central vertex scores exactly 1.0. This
//! is graph-relative, not the `(n-1)(n-2)/2` theoretical maximum. When the
//! maximum is 0 (no vertex lies between any pair) every score is 0.

use std::collections::{BTreeMap, VecDeque};

use petgraph::graph::NodeIndex;
use topograph_core::KnowledgeGraph;
use tracing::{debug, instrument};

use crate::graph::topology::Topology;

/// Normalized betweenness for every vertex of `kg`, dangling ones included.
///
/// Values lie in `[0, 1]`; the maximum is exactly 1.0 unless every value is 0.
#[must_use]
#[instrument(skip(kg))]
pub fn betweenness_centrality(kg: &KnowledgeGraph) -> BTreeMap<String, f64> {
    let topo = Topology::from_graph(kg);
    let mut scores = raw_scores(&topo);
    normalize_scores(&mut scores);
    to_map(&topo, &scores)
}

/// Unnormalized betweenness: for each vertex, the sum over unordered pairs
/// `{s, t}` of the fraction of shortest `s`–`t` paths passing through it.
#[must_use]
#[instrument(skip(kg))]
pub fn raw_betweenness(kg: &KnowledgeGraph) -> BTreeMap<String, f64> {
    let topo = Topology::from_graph(kg);
    let scores = raw_scores(&topo);
    to_map(&topo, &scores)
}

/// Divide every score by the maximum. A zero, negative, or non-finite
/// maximum maps every score to 0.
#[must_use]
pub fn normalize_by_max(raw: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let max = max_finite(raw.values().copied());
    raw.iter()
        .map(|(id, &v)| (id.clone(), scale(v, max)))
        .collect()
}

/// Raw betweenness indexed by `NodeIndex::index()`.
#[must_use]
pub fn raw_scores(topo: &Topology) -> Vec<f64> {
    let g = &topo.graph;
    let n = g.node_count();

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_indices() {
        let si = s.index();

        // Vertices in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

        // predecessors[w]: vertices immediately preceding w on shortest paths from s.
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (None = unvisited).
        let mut dist: Vec<Option<usize>> = vec![None; n];
        dist[si] = Some(0);

        let mut queue: VecDeque<NodeIndex> = VecDeque::from([s]);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);
            let Some(dv) = dist[vi] else { continue };

            for w in g.neighbors(v) {
                let wi = w.index();

                if dist[wi].is_none() {
                    dist[wi] = Some(dv + 1);
                    queue.push_back(w);
                }

                if dist[wi] == Some(dv + 1) {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = w.index();

            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    for score in &mut cb {
        *score /= 2.0;
    }

    debug!(vertices = n, "computed raw betweenness");
    cb
}

/// In-place form of [`normalize_by_max`] for index-ordered scores.
pub fn normalize_scores(scores: &mut [f64]) {
    let max = max_finite(scores.iter().copied());
    for score in scores.iter_mut() {
        *score = scale(*score, max);
    }
}

fn max_finite(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}

fn scale(value: f64, max: f64) -> f64 {
    if max > 0.0 && value.is_finite() {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn to_map(topo: &Topology, scores: &[f64]) -> BTreeMap<String, f64> {
    topo.graph
        .node_indices()
        .map(|idx| (topo.id(idx).to_string(), scores[idx.index()]))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use topograph_core::{KnowledgeEdge, KnowledgeNode};

    fn make_graph(nodes: &[&str], edges: &[(&str, &str)]) -> KnowledgeGraph {
        let mut kg = KnowledgeGraph::new();
        for id in nodes {
            kg.add_node(KnowledgeNode::new(*id, *id));
        }
        for (a, b) in edges {
            kg.add_edge(KnowledgeEdge::new(*a, *b));
        }
        kg
    }

    #[test]
    fn empty_graph_returns_empty() {
        let bc = betweenness_centrality(&KnowledgeGraph::new());
        assert!(bc.is_empty());
    }

    #[test]
    fn single_node_zero_betweenness() {
        let bc = betweenness_centrality(&make_graph(&["A"], &[]));
        assert_eq!(bc.get("A"), Some(&0.0));
    }

    #[test]
    fn single_edge_is_all_zero_not_nan() {
        let bc = betweenness_centrality(&make_graph(&[], &[("A", "B")]));
        for id in ["A", "B"] {
            assert!(bc[id].abs() < 1e-10, "{id} must be 0, got {}", bc[id]);
        }
    }

    #[test]
    fn path_middle_node_is_maximal() {
        // A - B - C
        let kg = make_graph(&[], &[("A", "B"), ("B", "C")]);
        let raw = raw_betweenness(&kg);
        assert!((raw["B"] - 1.0).abs() < 1e-10, "B is on the single A-C path");

        let bc = betweenness_centrality(&kg);
        assert!((bc["A"] - 0.0).abs() < 1e-10, "A is a leaf");
        assert!((bc["B"] - 1.0).abs() < 1e-10, "B is the maximum");
        assert!((bc["C"] - 0.0).abs() < 1e-10, "C is a leaf");
    }

    #[test]
    fn star_center_is_one() {
        let kg = make_graph(&[], &[("C", "L1"), ("C", "L2"), ("C", "L3"), ("C", "L4")]);
        let raw = raw_betweenness(&kg);
        // Every pair of the 4 leaves routes through C: C(4, 2) = 6.
        assert!((raw["C"] - 6.0).abs() < 1e-10, "got {}", raw["C"]);

        let bc = betweenness_centrality(&kg);
        assert!((bc["C"] - 1.0).abs() < 1e-10);
        for leaf in ["L1", "L2", "L3", "L4"] {
            assert!(bc[leaf].abs() < 1e-10, "{leaf} should be 0");
        }
    }

    #[test]
    fn square_splits_credit_between_paths() {
        // A - B - D, A - C - D: each of B and C carries half of A-D,
        // and A and D each carry half of B-C.
        let kg = make_graph(&[], &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let raw = raw_betweenness(&kg);
        for id in ["A", "B", "C", "D"] {
            assert!((raw[id] - 0.5).abs() < 1e-10, "{id}: got {}", raw[id]);
        }
        let bc = betweenness_centrality(&kg);
        for id in ["A", "B", "C", "D"] {
            assert!((bc[id] - 1.0).abs() < 1e-10, "{id}: got {}", bc[id]);
        }
    }

    #[test]
    fn chain_of_four_betweenness() {
        // A - B - C - D: B on A-C and A-D, C on A-D and B-D.
        let kg = make_graph(&[], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let raw = raw_betweenness(&kg);
        assert!((raw["B"] - 2.0).abs() < 1e-10, "got {}", raw["B"]);
        assert!((raw["C"] - 2.0).abs() < 1e-10, "got {}", raw["C"]);
        assert!(raw["A"].abs() < 1e-10);
    }

    #[test]
    fn dangling_endpoints_are_scored() {
        let kg = make_graph(&["A"], &[("A", "ghost"), ("ghost", "B")]);
        let bc = betweenness_centrality(&kg);
        assert!((bc["ghost"] - 1.0).abs() < 1e-10);
        assert_eq!(bc.len(), 3);
    }

    #[test]
    fn disconnected_components_no_cross_betweenness() {
        let kg = make_graph(&[], &[("A", "B"), ("C", "D")]);
        let bc = betweenness_centrality(&kg);
        for id in ["A", "B", "C", "D"] {
            assert!(bc[id].abs() < 1e-10, "{id} should be 0");
        }
    }

    #[test]
    fn normalize_by_max_guards_degenerate_maxima() {
        let zeros: BTreeMap<String, f64> =
            [("a".to_string(), 0.0), ("b".to_string(), 0.0)].into_iter().collect();
        assert!(normalize_by_max(&zeros).values().all(|v| v.abs() < 1e-10));

        let weird: BTreeMap<String, f64> = [
            ("a".to_string(), f64::NAN),
            ("b".to_string(), 4.0),
            ("c".to_string(), 2.0),
        ]
        .into_iter()
        .collect();
        let normalized = normalize_by_max(&weird);
        assert!(normalized["a"].abs() < 1e-10, "NaN input scores 0");
        assert!((normalized["b"] - 1.0).abs() < 1e-10);
        assert!((normalized["c"] - 0.5).abs() < 1e-10);
    }
}
