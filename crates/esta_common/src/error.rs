//! The engine's fatal error type.
//!
//! Every `esta_*` crate that makes up the core propagation pipeline returns
//! `Result<_, EstaError>`. There is no partial-result recovery inside the
//! core: any of these variants aborts the current analysis run and surfaces
//! at the call site. Node and edge identifiers are carried as raw indices
//! rather than the richer id newtypes defined in `esta_graph`, since this is
//! the crate every other `esta_*` crate depends on and must not depend back
//! on any of them.

use serde::{Deserialize, Serialize};

/// Result alias used throughout the engine's core crates.
pub type EstaResult<T> = Result<T, EstaError>;

/// A fatal error raised by the engine. All variants abort the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum EstaError {
    /// An edge references an unknown node, a node has the wrong endpoint
    /// type for its edge kind, or a sink node has outgoing edges.
    #[error("malformed graph: {detail} (node: {node:?}, edge: {edge:?})")]
    MalformedGraph {
        /// What was found to be wrong.
        detail: String,
        /// The offending node, if the malformation is node-centric.
        node: Option<u32>,
        /// The offending edge, if the malformation is edge-centric.
        edge: Option<u32>,
    },

    /// The builder could not resolve a subcircuit reference while
    /// constructing the graph handed to the core.
    #[error("unresolved instance: {detail}")]
    UnresolvedInstance {
        /// Description of the reference that could not be resolved.
        detail: String,
    },

    /// The delay table has no entry for a `(edge, output_transition)` pair
    /// required during propagation.
    #[error(
        "no modeled delay for edge {edge} (input transition {input_transition}, output transition {output_transition})"
    )]
    UnmodeledDelay {
        /// The edge whose delay table entry is missing.
        edge: u32,
        /// The input transition of the lookup that failed.
        input_transition: String,
        /// The output transition of the lookup that failed.
        output_transition: String,
    },

    /// A node's permutation count exceeded the configured `max_permutations`.
    #[error("permutation budget exceeded at node {node}: {count} permutations (budget {budget})")]
    PermutationBudgetExceeded {
        /// The node being processed when the budget was exceeded.
        node: u32,
        /// The permutation count that would have been generated.
        count: u64,
        /// The configured budget.
        budget: u64,
    },

    /// A post-sweep check found `|sum of probabilities - 1| > tolerance` at a node.
    #[error("probability mass violation at node {node}: sum = {sum} (tolerance {tolerance})")]
    ProbabilityMassViolation {
        /// The node whose tag probabilities failed to sum to 1.
        node: u32,
        /// The observed sum.
        sum: f64,
        /// The tolerance that was exceeded.
        tolerance: f64,
    },

    /// Any other violation of a documented invariant (for example, an edge
    /// crossing levels after levelization, or a tag store found in an
    /// inconsistent state).
    #[error("internal invariant violated: {message}")]
    InternalInvariant {
        /// Description of the violated invariant.
        message: String,
    },
}

impl EstaError {
    /// Shorthand for constructing [`EstaError::InternalInvariant`].
    pub fn internal(message: impl Into<String>) -> Self {
        EstaError::InternalInvariant {
            message: message.into(),
        }
    }
}
