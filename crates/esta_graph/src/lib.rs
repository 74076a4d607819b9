//! The timing graph and delay table (components C1 and C2): a typed,
//! levelized, column-oriented DAG and the read-only per-edge delay lookup
//! that annotates it.

#![warn(missing_docs)]

pub mod delay;
pub mod edge;
pub mod graph;
pub mod ids;
pub mod node;

pub use delay::DelayTable;
pub use edge::EdgeKind;
pub use graph::{TimingGraph, UNLEVELED};
pub use ids::{DomainId, EdgeId, NodeId};
pub use node::NodeKind;
