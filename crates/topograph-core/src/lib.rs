#![forbid(unsafe_code)]
//! topograph-core library.
//!
//! # Conventions
//!
//! - **Errors**: Use [`error::TopographError`] for loader failures and
//!   `anyhow::Result` for configuration plumbing. Graph operations are total
//!   and never fail.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod eav;
pub mod error;
pub mod model;
pub mod store;

pub use eav::{EntityRecord, SemanticTriple, extract_entities_from_eavs, load_triples};
pub use error::{ErrorCode, TopographError};
pub use model::{
    AttributeCategory, EdgeMetadata, GraphSnapshot, KnowledgeEdge, KnowledgeNode, NodeMetadata,
};
pub use store::{KnowledgeGraph, load_snapshot};
