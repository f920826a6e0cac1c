//! Canonical graph views consumed by every analysis.
//!
//! ## Pipeline
//!
//! ```text
//! KnowledgeGraph (store, insertion-ordered arena)
//!        ↓  topology::Topology::from_graph()
//! Topology (sorted, de-duplicated UnGraph)
//!   ├─ bridges::find_bridges()      weak-cut candidates
//!   └─ metrics::*                   centrality, components
//! ```
//!
//! ## Cache Invalidation
//!
//! [`Topology::content_hash`] carries the store's BLAKE3 topology hash.
//! Results derived from a view stay valid while the hash is unchanged.

pub mod bridges;
pub mod topology;

pub use bridges::{find_bridges, side_of_cut};
pub use topology::Topology;
