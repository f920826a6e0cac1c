//! Structural hole detection.
//!
//! # Overview
//!
//! A structural hole is a pair of entity clusters with few or no relations
//! between them. Holes point at content gaps: topics that should reference
//! each other but do not.
//!
//! # Algorithm
//!
//! 1. Split the canonical topology into connected components.
//! 2. Every pair of components is a hole with strength 0, whatever the
//!    threshold.
//! 3. Inside each component, every bridge edge splits the component in two.
//!    When both sides hold at least `min_cluster_size` vertices and the
//!    connection strength of the split is below the threshold, the split is
//!    a hole too.
//!
//! Connection strength is `cross edges / (|A| * |B|)`. For a bridge split
//! there is exactly one cross edge, so the strength is `1 / (|A| * |B|)`.
//!
//! # Ordering
//!
//! Holes are sorted by strength ascending. The sort is stable: disconnected
//! pairs come first in component order, then weak cuts in bridge order.
//! Clusters list vertex ids in ascending order.

#![allow(clippy::module_name_repetitions)]

use std::{fmt, str::FromStr};

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use topograph_core::config::HolesConfig;
use topograph_core::{KnowledgeGraph, TopographError};
use tracing::{debug, instrument, trace};

use crate::graph::bridges::{find_bridges, side_of_cut};
use crate::graph::topology::Topology;
use crate::metrics::betweenness::{normalize_scores, raw_scores};
use crate::metrics::components::connected_components;

/// Strength below which a weak cut is reported.
pub const DEFAULT_HOLE_THRESHOLD: f64 = 0.15;
/// Maximum number of bridge candidates listed per hole.
pub const DEFAULT_MAX_BRIDGE_CANDIDATES: usize = 5;
/// Smallest side a weak cut may have.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 2;

// ---------------------------------------------------------------------------
// HolePriority
// ---------------------------------------------------------------------------

/// Urgency of a hole, derived only from its connection strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolePriority {
    Critical,
    High,
    Medium,
    Low,
}

impl HolePriority {
    /// `critical` at 0, `high` below 0.05, `medium` below 0.1, else `low`.
    #[must_use]
    pub fn from_strength(strength: f64) -> Self {
        if strength <= 0.0 {
            Self::Critical
        } else if strength < 0.05 {
            Self::High
        } else if strength < 0.1 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for HolePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HolePriority {
    type Err = TopographError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(TopographError::InvalidEnum {
                expected: "hole priority",
                got: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// StructuralHole / HoleConfig
// ---------------------------------------------------------------------------

/// Two weakly connected (or disconnected) clusters of entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralHole {
    pub cluster_a: Vec<String>,
    pub cluster_b: Vec<String>,
    /// `cross edges / (|A| * |B|)`, in `[0, 1]`.
    pub connection_strength: f64,
    /// Vertices from either cluster, best bridging candidate first.
    pub bridge_candidates: Vec<String>,
    pub priority: HolePriority,
}

/// Tuning knobs for [`identify_structural_holes_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleConfig {
    pub threshold: f64,
    pub max_bridge_candidates: usize,
    pub min_cluster_size: usize,
}

impl Default for HoleConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HOLE_THRESHOLD,
            max_bridge_candidates: DEFAULT_MAX_BRIDGE_CANDIDATES,
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

impl HoleConfig {
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

impl From<&HolesConfig> for HoleConfig {
    fn from(cfg: &HolesConfig) -> Self {
        Self {
            threshold: cfg.threshold,
            max_bridge_candidates: cfg.max_bridge_candidates,
            min_cluster_size: cfg.min_cluster_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Structural holes below `threshold`, with default candidate and cluster limits.
#[must_use]
pub fn identify_structural_holes(kg: &KnowledgeGraph, threshold: f64) -> Vec<StructuralHole> {
    identify_structural_holes_with(kg, &HoleConfig::with_threshold(threshold))
}

/// Structural holes of `kg` under `config`.
#[must_use]
#[instrument(skip(kg), fields(vertices = kg.vertex_count()))]
pub fn identify_structural_holes_with(
    kg: &KnowledgeGraph,
    config: &HoleConfig,
) -> Vec<StructuralHole> {
    let topo = Topology::from_graph(kg);
    holes_in_topology(&topo, config)
}

/// Hole detection on an already-built view.
#[must_use]
pub fn holes_in_topology(topo: &Topology, config: &HoleConfig) -> Vec<StructuralHole> {
    if topo.node_count() < 2 {
        return Vec::new();
    }

    let mut splits: Vec<(Vec<NodeIndex>, Vec<NodeIndex>, f64)> = Vec::new();

    let components = connected_components(topo);
    for (i, a) in components.iter().enumerate() {
        for b in &components[i + 1..] {
            splits.push((a.clone(), b.clone(), 0.0));
        }
    }
    let disconnected = splits.len();

    for cut in find_bridges(topo) {
        let side_a = side_of_cut(topo, cut, cut.0);
        let side_b = side_of_cut(topo, cut, cut.1);
        if side_a.len() < config.min_cluster_size || side_b.len() < config.min_cluster_size {
            continue;
        }
        let strength = connection_strength(topo, &side_a, &side_b);
        trace!(
            a = topo.id(cut.0),
            b = topo.id(cut.1),
            strength,
            "evaluated bridge cut"
        );
        if strength < config.threshold {
            splits.push((side_a, side_b, strength));
        }
    }

    if splits.is_empty() {
        debug!("no structural holes");
        return Vec::new();
    }

    let mut betweenness = raw_scores(topo);
    normalize_scores(&mut betweenness);

    let mut holes: Vec<StructuralHole> = splits
        .into_iter()
        .map(|(a, b, strength)| StructuralHole {
            bridge_candidates: rank_bridge_candidates(
                topo,
                &betweenness,
                &a,
                &b,
                config.max_bridge_candidates,
            ),
            cluster_a: topo.ids(&a),
            cluster_b: topo.ids(&b),
            connection_strength: strength,
            priority: HolePriority::from_strength(strength),
        })
        .collect();

    holes.sort_by(|x, y| x.connection_strength.total_cmp(&y.connection_strength));

    debug!(
        holes = holes.len(),
        disconnected,
        weak_cuts = holes.len() - disconnected,
        "identified structural holes"
    );
    holes
}

/// `cross edges / (|a| * |b|)`; 0 when either side is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn connection_strength(topo: &Topology, a: &[NodeIndex], b: &[NodeIndex]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let n = topo.node_count();
    let mut in_a = FixedBitSet::with_capacity(n);
    let mut in_b = FixedBitSet::with_capacity(n);
    a.iter().for_each(|idx| in_a.insert(idx.index()));
    b.iter().for_each(|idx| in_b.insert(idx.index()));

    let cross = topo
        .graph
        .raw_edges()
        .iter()
        .filter(|e| {
            let (s, t) = (e.source().index(), e.target().index());
            (in_a.contains(s) && in_b.contains(t)) || (in_b.contains(s) && in_a.contains(t))
        })
        .count();

    cross as f64 / (a.len() as f64 * b.len() as f64)
}

/// Vertices of both clusters ranked by normalized betweenness (desc), then
/// degree (desc), then id (asc).
fn rank_bridge_candidates(
    topo: &Topology,
    betweenness: &[f64],
    a: &[NodeIndex],
    b: &[NodeIndex],
    limit: usize,
) -> Vec<String> {
    let score = |idx: NodeIndex| betweenness.get(idx.index()).copied().unwrap_or(0.0);

    let mut candidates: Vec<NodeIndex> = a.iter().chain(b).copied().collect();
    candidates.sort_by(|&x, &y| {
        score(y)
            .total_cmp(&score(x))
            .then_with(|| topo.degree(y).cmp(&topo.degree(x)))
            .then_with(|| x.cmp(&y))
    });
    candidates.truncate(limit);
    topo.ids(&candidates)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
