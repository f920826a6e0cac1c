//! Structural metrics over the canonical topology.
//!
//! - **Betweenness centrality** (`betweenness`): which entities sit on the
//!   shortest paths between other entities?
//! - **Components** (`components`): which groups of entities are connected
//!   at all?
//!
//! ```rust,ignore
//! use topograph_analysis::metrics::betweenness::betweenness_centrality;
//! use topograph_analysis::metrics::components::connected_components;
//!
//! let bc = betweenness_centrality(&kg);
//! let groups = connected_components(&Topology::from_graph(&kg));
//! ```

pub mod betweenness;
pub mod components;
