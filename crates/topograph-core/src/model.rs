//! Knowledge-graph records: nodes, edges, snapshots, and attribute categories.
//!
//! JSON forms use camelCase keys so snapshots exchanged with the content
//! strategy layer keep their existing shape (`{"nodes": [...], "edges": [...]}`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use crate::error::TopographError;

/// Relation label used when an edge does not name one.
pub const DEFAULT_RELATION: &str = "relates_to";

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Typed node metadata with an open side channel for unknown keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    /// Importance hint in `[0, 1]`, if the producer supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<f64>,
    /// Provenance of the node (e.g. `"eav"`, `"manual"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Typed edge metadata with an open side channel for unknown keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// KnowledgeNode
// ---------------------------------------------------------------------------

/// An entity or concept in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeNode {
    pub id: String,
    #[serde(default)]
    pub term: String,
    /// Open tag such as `"concept"` or `"entity"`.
    #[serde(rename = "type", default = "default_node_kind")]
    pub kind: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl KnowledgeNode {
    /// Create a `concept` node whose term is `term`.
    pub fn new(id: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            kind: default_node_kind(),
            definition: String::new(),
            metadata: NodeMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    #[must_use]
    pub const fn with_importance(mut self, importance: f64) -> Self {
        self.metadata.importance = Some(importance);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }
}

fn default_node_kind() -> String {
    "concept".to_string()
}

// ---------------------------------------------------------------------------
// KnowledgeEdge
// ---------------------------------------------------------------------------

/// A relation between two nodes. Direction is a label only; analysis treats
/// every edge as undirected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEdge {
    /// Empty ids are replaced by `"<source>-<target>"` on insert.
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default = "default_relation")]
    pub relation: String,
    #[serde(default)]
    pub metadata: EdgeMetadata,
}

impl KnowledgeEdge {
    /// Create a `relates_to` edge with the default `"<source>-<target>"` id.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: default_edge_id(&source, &target),
            source,
            target,
            relation: default_relation(),
            metadata: EdgeMetadata::default(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = relation.into();
        self
    }

    #[must_use]
    pub fn with_source_tag(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    /// Fill in the default id when none was given.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.id.trim().is_empty() {
            self.id = default_edge_id(&self.source, &self.target);
        }
        self
    }
}

/// The id an edge receives when the caller leaves it blank.
#[must_use]
pub fn default_edge_id(source: &str, target: &str) -> String {
    format!("{source}-{target}")
}

fn default_relation() -> String {
    DEFAULT_RELATION.to_string()
}

// ---------------------------------------------------------------------------
// GraphSnapshot
// ---------------------------------------------------------------------------

/// Full serializable state of a [`crate::store::KnowledgeGraph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<KnowledgeNode>,
    #[serde(default)]
    pub edges: Vec<KnowledgeEdge>,
}

// ---------------------------------------------------------------------------
// AttributeCategory
// ---------------------------------------------------------------------------

/// Coarse importance tag assigned to an entity attribute upstream.
///
/// Variants are declared lowest priority first, so `Ord` ranks
/// `Unique > Root > Rare > Common` and `max()` picks the highest priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeCategory {
    #[default]
    #[serde(alias = "common")]
    Common,
    #[serde(alias = "rare")]
    Rare,
    #[serde(alias = "root")]
    Root,
    #[serde(alias = "unique")]
    Unique,
}

impl AttributeCategory {
    pub const ALL: [Self; 4] = [Self::Unique, Self::Root, Self::Rare, Self::Common];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Unique => "UNIQUE",
            Self::Root => "ROOT",
            Self::Rare => "RARE",
            Self::Common => "COMMON",
        }
    }

    /// Base criticality weight for an entity whose strongest attribute has
    /// this category.
    #[must_use]
    pub const fn base_weight(self) -> f64 {
        match self {
            Self::Unique => 0.9,
            Self::Root => 0.8,
            Self::Rare => 0.6,
            Self::Common => 0.4,
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeCategory {
    type Err = TopographError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNIQUE" => Ok(Self::Unique),
            "ROOT" => Ok(Self::Root),
            "RARE" => Ok(Self::Rare),
            "COMMON" => Ok(Self::Common),
            _ => Err(TopographError::InvalidEnum {
                expected: "attribute category",
                got: s.to_string(),
            }),
        }
    }
}
