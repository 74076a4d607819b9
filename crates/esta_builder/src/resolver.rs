//! The name-resolver interface a builder hands to the core (spec §6): a
//! `node_id -> string` lookup the core treats opaquely and uses only when
//! emitting reports.

use std::collections::HashMap;

use esta_common::{Ident, Interner};
use esta_graph::NodeId;

/// Resolves a node id to its human-readable name.
///
/// The core never parses or compares the returned string; it is carried
/// through to reports unchanged. A node with no recorded name (an
/// internal bookkeeping node the builder never named) resolves to `None`.
pub trait NameResolver {
    /// Returns `node`'s name, if one was recorded.
    fn node_name(&self, node: NodeId) -> Option<&str>;
}

/// The default [`NameResolver`]: an [`Interner`] plus a `NodeId -> Ident`
/// lookup, populated as a [`crate::builder::GraphBuilder`] names nodes.
#[derive(Debug, Default)]
pub struct InternedResolver {
    interner: Interner,
    names: HashMap<NodeId, Ident>,
}

impl InternedResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            names: HashMap::new(),
        }
    }

    /// Interns `name` and records it as `node`'s name, returning the
    /// resulting `Ident` for storage on the graph.
    pub fn record(&mut self, node: NodeId, name: &str) -> Ident {
        let ident = self.interner.get_or_intern(name);
        self.names.insert(node, ident);
        ident
    }
}

impl NameResolver for InternedResolver {
    fn node_name(&self, node: NodeId) -> Option<&str> {
        self.names.get(&node).map(|&ident| self.interner.resolve(ident))
    }
}
