//! Semantic triples (EAVs) and entity extraction.
//!
//! A triple states one attribute of a topic: `(Solar Panel, efficiency, 22%)`.
//! [`extract_entities_from_eavs`] turns a list of triples into one
//! [`EntityRecord`] per distinct entity name, ready to be scored for
//! criticality.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, instrument};

use crate::error::{TopographError, read_input};
use crate::model::{AttributeCategory, DEFAULT_RELATION};

// ---------------------------------------------------------------------------
// Triples
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleSubject {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplePredicate {
    #[serde(default = "default_relation")]
    pub relation: String,
    /// Missing categories count as [`AttributeCategory::Common`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<AttributeCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleObject {
    /// Scalar JSON values (numbers, booleans) are read as their text form.
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
}

/// One subject–predicate–object fact about a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTriple {
    pub subject: TripleSubject,
    pub predicate: TriplePredicate,
    pub object: TripleObject,
}

impl SemanticTriple {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: TripleSubject {
                label: subject.into(),
            },
            predicate: TriplePredicate {
                relation: relation.into(),
                category: None,
            },
            object: TripleObject {
                value: object.into(),
            },
        }
    }

    #[must_use]
    pub const fn with_category(mut self, category: AttributeCategory) -> Self {
        self.predicate.category = Some(category);
        self
    }

    /// The category this triple assigns, defaulting to `COMMON`.
    #[must_use]
    pub fn category(&self) -> AttributeCategory {
        self.predicate.category.unwrap_or_default()
    }
}

fn default_relation() -> String {
    DEFAULT_RELATION.to_string()
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "object value must be a scalar, got {other}"
        ))),
    }
}

/// Parse a JSON array of triples.
///
/// # Errors
///
/// Returns [`TopographError::Triples`] when `json` is not an array of triples.
pub fn parse_triples(json: &str) -> Result<Vec<SemanticTriple>, TopographError> {
    serde_json::from_str(json).map_err(TopographError::Triples)
}

/// Load a JSON array of triples from disk.
///
/// # Errors
///
/// Returns [`TopographError`] when the file is missing, unreadable, or malformed.
pub fn load_triples(path: &Path) -> Result<Vec<SemanticTriple>, TopographError> {
    let content = read_input(path)?;
    parse_triples(&content)
}

// ---------------------------------------------------------------------------
// Entity extraction
// ---------------------------------------------------------------------------

/// An entity observed in a set of triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub name: String,
    pub is_central_entity: bool,
    /// Highest-priority category among all triples mentioning the entity.
    pub attribute_category: AttributeCategory,
    /// Number of distinct subjects the entity co-occurs with.
    pub topic_count: u32,
    /// Subject labels the entity co-occurs with, in first-seen order.
    pub sources: Vec<String>,
    pub is_core_section_entity: bool,
}

#[derive(Debug)]
struct Accumulator {
    name: String,
    category: AttributeCategory,
    sources: Vec<String>,
}

impl Accumulator {
    fn observe(&mut self, category: AttributeCategory, subject: &str) {
        self.category = self.category.max(category);
        if !self.sources.iter().any(|s| s == subject) {
            self.sources.push(subject.to_string());
        }
    }
}

/// Extract one [`EntityRecord`] per distinct entity name.
///
/// Every non-blank subject label and object value is an entity; names are
/// trimmed and compared exactly. Records come back in first-appearance order.
/// Triples with a blank subject are skipped because they have no topic to
/// co-occur with.
///
/// - `central_entity` matches case-insensitively; a blank name matches nothing.
/// - `core_topic_ids` are compared against subject labels.
#[must_use]
#[instrument(skip_all, fields(triples = triples.len()))]
pub fn extract_entities_from_eavs<S: AsRef<str>>(
    triples: &[SemanticTriple],
    central_entity: &str,
    core_topic_ids: &[S],
) -> Vec<EntityRecord> {
    let mut order: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let mut observe = |name: &str, category: AttributeCategory, subject: &str| {
        let slot = *index.entry(name.to_string()).or_insert_with(|| {
            order.push(Accumulator {
                name: name.to_string(),
                category,
                sources: Vec::new(),
            });
            order.len() - 1
        });
        order[slot].observe(category, subject);
    };

    for triple in triples {
        let subject = triple.subject.label.trim();
        if subject.is_empty() {
            continue;
        }
        let category = triple.category();
        observe(subject, category, subject);

        let object = triple.object.value.trim();
        if !object.is_empty() {
            observe(object, category, subject);
        }
    }

    let central = central_entity.trim().to_lowercase();
    let core: HashSet<&str> = core_topic_ids.iter().map(AsRef::as_ref).collect();

    let records: Vec<EntityRecord> = order
        .into_iter()
        .map(|acc| {
            let is_central_entity = !central.is_empty() && acc.name.to_lowercase() == central;
            let is_core_section_entity = acc.sources.iter().any(|s| core.contains(s.as_str()));
            EntityRecord {
                is_central_entity,
                attribute_category: acc.category,
                topic_count: u32::try_from(acc.sources.len()).unwrap_or(u32::MAX),
                sources: acc.sources,
                is_core_section_entity,
                name: acc.name,
            }
        })
        .collect();

    debug!(entities = records.len(), "extracted entities from triples");
    records
}
