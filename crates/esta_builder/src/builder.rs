//! `GraphBuilder`: a thin convenience wrapper over
//! [`esta_graph::TimingGraph`]'s `add_node`/`add_edge`/`set_node_func` plus
//! [`esta_graph::DelayTable`] registration and name-resolver bookkeeping,
//! standing in for the builder half of the Builder -> Core interface
//! (spec §6) that a real netlist/back-annotation parser would drive.

use esta_bdd::{BddFunc, BddManager};
use esta_common::{EstaResult, Transition};
use esta_graph::{DelayTable, DomainId, EdgeId, NodeId, NodeKind, TimingGraph};

use crate::resolver::InternedResolver;

/// Accumulates a [`TimingGraph`] and its [`DelayTable`] one node/edge at a
/// time, naming every node through an [`InternedResolver`] as it goes.
///
/// `finish` levelizes the graph; callers then hand `(graph, delays,
/// resolver)` to `esta_engine::run_analysis`.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: TimingGraph,
    delays: DelayTable,
    resolver: InternedResolver,
}

impl GraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of the given kind and clock domain, optionally naming it.
    ///
    /// The node id is reserved first so the resolver can record it, since
    /// [`InternedResolver::record`] needs the id `add_node` only assigns on
    /// return; the graph's own `Ident` column is then populated with the
    /// same interned name so diagnostics that only see a `NodeId` can still
    /// recover an `Ident` directly off the graph.
    pub fn add_node(&mut self, kind: NodeKind, domain: DomainId, name: Option<&str>) -> NodeId {
        match name {
            Some(name) => {
                let reserved = self.graph.add_node(kind, domain, None);
                let ident = self.resolver.record(reserved, name);
                self.graph.rename_node(reserved, ident);
                reserved
            }
            None => self.graph.add_node(kind, domain, None),
        }
    }

    /// Adds an edge `from -> to`, deriving its [`esta_graph::EdgeKind`] from
    /// the endpoints.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> EstaResult<EdgeId> {
        self.graph.add_edge(from, to)
    }

    /// Assigns the Boolean function a `PrimitiveOpin`/`ConstantGenSource`
    /// node computes over its fanin pins, in fanin order.
    pub fn set_node_func(&mut self, node: NodeId, func: BddFunc) -> EstaResult<()> {
        self.graph.set_node_func(node, func)
    }

    /// The BDD variable standing for the `pin_index`-th fanin pin of a
    /// primitive, in the node-logic manager's own variable space (distinct
    /// from the engine's primary-input transition-encoding space).
    pub fn fanin_var(&mut self, pin_index: u32) -> BddFunc {
        self.graph.logic_mgr_mut().var(pin_index)
    }

    /// The node-logic manager itself, for callers that need to combine
    /// fanin variables into a function (e.g. a netlist parser building an
    /// `AND`/`OR`/`NOT` tree) rather than just reading one off by index.
    pub fn logic_mgr_mut(&mut self) -> &mut BddManager {
        self.graph.logic_mgr_mut()
    }

    /// Records `delay` for `edge` going from `input_transition` to
    /// `output_transition`.
    pub fn set_delay(
        &mut self,
        edge: EdgeId,
        input_transition: Transition,
        output_transition: Transition,
        delay: f64,
    ) {
        self.delays.set_delay(edge, input_transition, output_transition, delay);
    }

    /// Records `delay` for every `(input, output)` pair drawn from the four
    /// event transitions, a shorthand for primitives whose delay does not
    /// depend on which transition pair actually occurred (e.g. a demo
    /// netlist's unit-delay primitives).
    pub fn set_uniform_delay(&mut self, edge: EdgeId, delay: f64) {
        for &it in &Transition::EVENTS {
            for &ot in &Transition::EVENTS {
                self.set_delay(edge, it, ot, delay);
            }
        }
    }

    /// Records `delay` for the diagonal `(t, t)` pairs a relaying (non-logic)
    /// edge is ever looked up with: net edges, pad/clock-network bookkeeping
    /// arcs, and a flip-flop's `D`/`Q` internal arcs. `Clock`-carrying edges
    /// need no entry at all ([`esta_graph::DelayTable::edge_delay`] always
    /// resolves a `Clock` output transition to `0.0`).
    pub fn set_passthrough_delay(&mut self, edge: EdgeId, delay: f64) {
        for &t in &Transition::EVENTS {
            self.set_delay(edge, t, t, delay);
        }
    }

    /// Levelizes the accumulated graph, finishing construction.
    pub fn finish(mut self) -> EstaResult<(TimingGraph, DelayTable, InternedResolver)> {
        self.graph.levelize()?;
        Ok((self.graph, self.delays, self.resolver))
    }
}
