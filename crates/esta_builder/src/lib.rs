//! The builder half of the Builder -> Core interface (spec §6): helpers for
//! accumulating a [`esta_graph::TimingGraph`] and its
//! [`esta_graph::DelayTable`] node by node, plus a minimal in-memory text
//! netlist format standing in for the out-of-scope BLIF/back-annotation
//! parsers, for tests and demos.
//!
//! The core (`esta_engine`) never depends on this crate; a real embedder
//! wires its own netlist/back-annotation reader directly against
//! `esta_graph`/`esta_tags` instead.

#![warn(missing_docs)]

mod builder;
mod netlist;
mod resolver;

pub use builder::GraphBuilder;
pub use netlist::NetlistBuilder;
pub use resolver::{InternedResolver, NameResolver};
