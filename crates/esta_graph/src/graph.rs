//! The timing graph (component C1): a typed, levelized DAG stored
//! column-oriented (struct-of-arrays) so that a forward sweep over millions
//! of nodes walks flat `Vec`s rather than chasing pointers between
//! individually heap-allocated node objects.

use std::collections::VecDeque;

use esta_bdd::{BddFunc, BddManager};
use esta_common::{EstaError, EstaResult, Ident};

use crate::edge::EdgeKind;
use crate::ids::{DomainId, EdgeId, NodeId};
use crate::node::NodeKind;

/// The timing graph.
///
/// Every per-node and per-edge attribute lives in its own parallel `Vec`,
/// indexed by [`NodeId::as_raw`]/[`EdgeId::as_raw`]. A sweep that only reads
/// one or two attributes (e.g. level and function during propagation) never
/// touches the others' cache lines.
#[derive(Debug, Default)]
pub struct TimingGraph {
    node_kind: Vec<NodeKind>,
    node_domain: Vec<DomainId>,
    node_name: Vec<Option<Ident>>,
    node_func: Vec<Option<BddFunc>>,
    node_level: Vec<u32>,
    node_fanin: Vec<Vec<EdgeId>>,
    node_fanout: Vec<Vec<EdgeId>>,

    edge_kind: Vec<EdgeKind>,
    edge_from: Vec<NodeId>,
    edge_to: Vec<NodeId>,

    levelized: bool,

    /// The BDD manager node functions (`node_func`) are handles into.
    ///
    /// Kept distinct from the primary-input transition-encoding manager the
    /// #SAT evaluator builds `xfunc`s in: the two live in unrelated variable
    /// spaces (fanin-pin index vs. PI-transition encoding) and mixing
    /// handles between them would be meaningless.
    logic_mgr: BddManager,
}

/// The level assigned to a node before [`TimingGraph::levelize`] has run.
pub const UNLEVELED: u32 = u32::MAX;

impl TimingGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of the given kind and clock domain, returning its id.
    /// Pass [`DomainId::INVALID`] for nodes with no clock domain membership
    /// (e.g. purely combinational nodes not yet assigned one).
    pub fn add_node(&mut self, kind: NodeKind, domain: DomainId, name: Option<Ident>) -> NodeId {
        let id = NodeId::from_raw(self.node_kind.len() as u32);
        self.node_kind.push(kind);
        self.node_domain.push(domain);
        self.node_name.push(name);
        self.node_func.push(None);
        self.node_level.push(UNLEVELED);
        self.node_fanin.push(Vec::new());
        self.node_fanout.push(Vec::new());
        self.levelized = false;
        id
    }

    /// Adds an edge `from -> to`, deriving its [`EdgeKind`] from the
    /// endpoints' node kinds.
    ///
    /// Fails if either endpoint is out of range, if `from` is a sink node
    /// (sinks have no fanout by construction), or if the endpoint pairing
    /// does not correspond to any recognized edge kind.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> EstaResult<EdgeId> {
        let from_kind = self.node_kind(from)?;
        let to_kind = self.node_kind(to)?;
        if from_kind.is_sink() {
            return Err(EstaError::MalformedGraph {
                detail: "sink node has outgoing edges".to_string(),
                node: Some(from.as_raw()),
                edge: None,
            });
        }
        let kind = EdgeKind::derive(from_kind, to_kind)?;

        let id = EdgeId::from_raw(self.edge_kind.len() as u32);
        self.edge_kind.push(kind);
        self.edge_from.push(from);
        self.edge_to.push(to);
        self.node_fanout[from.as_raw() as usize].push(id);
        self.node_fanin[to.as_raw() as usize].push(id);
        self.levelized = false;
        Ok(id)
    }

    /// Assigns the Boolean function a `PrimitiveOpin`/`FfOpin` node computes
    /// over its fanin, in the order [`TimingGraph::fanin`] returns.
    pub fn set_node_func(&mut self, node: NodeId, func: BddFunc) -> EstaResult<()> {
        let kind = self.node_kind(node)?;
        if !kind.carries_function() {
            return Err(EstaError::MalformedGraph {
                detail: format!("node kind {kind:?} does not carry a function"),
                node: Some(node.as_raw()),
                edge: None,
            });
        }
        self.node_func[node.as_raw() as usize] = Some(func);
        Ok(())
    }

    fn check_node(&self, node: NodeId) -> EstaResult<usize> {
        let idx = node.as_raw() as usize;
        if idx >= self.node_kind.len() {
            return Err(EstaError::MalformedGraph {
                detail: "node id out of range".to_string(),
                node: Some(node.as_raw()),
                edge: None,
            });
        }
        Ok(idx)
    }

    /// The kind of `node`.
    pub fn node_kind(&self, node: NodeId) -> EstaResult<NodeKind> {
        self.check_node(node).map(|idx| self.node_kind[idx])
    }

    /// The clock domain `node` belongs to, or [`DomainId::INVALID`].
    pub fn node_domain(&self, node: NodeId) -> EstaResult<DomainId> {
        self.check_node(node).map(|idx| self.node_domain[idx])
    }

    /// The interned name of `node`, if one was recorded.
    pub fn node_name(&self, node: NodeId) -> EstaResult<Option<Ident>> {
        self.check_node(node).map(|idx| self.node_name[idx])
    }

    /// Records (or overwrites) `node`'s interned name. Builders call this
    /// once per node, after interning the name through their own
    /// name-resolver, so the graph itself carries an `Ident` alongside
    /// whatever string-keyed lookup the resolver maintains.
    pub fn rename_node(&mut self, node: NodeId, name: Ident) {
        if let Ok(idx) = self.check_node(node) {
            self.node_name[idx] = Some(name);
        }
    }

    /// The Boolean function `node` computes over its fanin, if assigned.
    pub fn node_func(&self, node: NodeId) -> EstaResult<Option<BddFunc>> {
        self.check_node(node).map(|idx| self.node_func[idx])
    }

    /// The level assigned by [`TimingGraph::levelize`], or [`UNLEVELED`].
    pub fn node_level(&self, node: NodeId) -> EstaResult<u32> {
        self.check_node(node).map(|idx| self.node_level[idx])
    }

    /// The edges fanning in to `node`, in insertion order.
    pub fn fanin(&self, node: NodeId) -> EstaResult<&[EdgeId]> {
        self.check_node(node)
            .map(|idx| self.node_fanin[idx].as_slice())
    }

    /// The edges fanning out of `node`, in insertion order.
    pub fn fanout(&self, node: NodeId) -> EstaResult<&[EdgeId]> {
        self.check_node(node)
            .map(|idx| self.node_fanout[idx].as_slice())
    }

    /// The kind of `edge`.
    pub fn edge_kind(&self, edge: EdgeId) -> EdgeKind {
        self.edge_kind[edge.as_raw() as usize]
    }

    /// The `(from, to)` endpoints of `edge`.
    pub fn edge_endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        let idx = edge.as_raw() as usize;
        (self.edge_from[idx], self.edge_to[idx])
    }

    /// The BDD manager node functions are expressed in terms of, for
    /// read-only operations (support, cofactor, restrict) during evaluation.
    pub fn logic_mgr(&self) -> &BddManager {
        &self.logic_mgr
    }

    /// Mutable access to the node-logic BDD manager, for building new node
    /// functions (e.g. from the builder) or performing restriction during
    /// transition evaluation (restriction mutates the manager's caches).
    pub fn logic_mgr_mut(&mut self) -> &mut BddManager {
        &mut self.logic_mgr
    }

    /// The number of nodes in the graph.
    pub fn num_nodes(&self) -> usize {
        self.node_kind.len()
    }

    /// The number of edges in the graph.
    pub fn num_edges(&self) -> usize {
        self.edge_kind.len()
    }

    /// `true` once [`TimingGraph::levelize`] has run since the last
    /// structural change.
    pub fn is_levelized(&self) -> bool {
        self.levelized
    }

    /// Assigns each node a level equal to the length of the longest path
    /// from a source node, via Kahn's algorithm over in-degree.
    ///
    /// Fails with `MalformedGraph` if the graph contains a cycle (every
    /// node must be reachable from some source by the time the frontier
    /// empties).
    pub fn levelize(&mut self) -> EstaResult<()> {
        let n = self.num_nodes();
        let mut remaining_fanin: Vec<usize> = self.node_fanin.iter().map(Vec::len).collect();
        let mut level = vec![0u32; n];
        let mut queue: VecDeque<usize> = (0..n).filter(|&i| remaining_fanin[i] == 0).collect();
        let mut visited = 0usize;

        while let Some(idx) = queue.pop_front() {
            visited += 1;
            let node_level = level[idx];
            for &edge in &self.node_fanout[idx] {
                let to = self.edge_to[edge.as_raw() as usize].as_raw() as usize;
                level[to] = level[to].max(node_level + 1);
                remaining_fanin[to] -= 1;
                if remaining_fanin[to] == 0 {
                    queue.push_back(to);
                }
            }
        }

        if visited != n {
            return Err(EstaError::MalformedGraph {
                detail: "graph contains a cycle".to_string(),
                node: None,
                edge: None,
            });
        }

        self.node_level = level;
        self.levelized = true;
        Ok(())
    }

    /// The highest level assigned by [`TimingGraph::levelize`], or `0` for
    /// an empty or not-yet-levelized graph.
    pub fn max_level(&self) -> u32 {
        self.node_level
            .iter()
            .copied()
            .filter(|&l| l != UNLEVELED)
            .max()
            .unwrap_or(0)
    }

    /// Returns the ids of all nodes at `level`, in ascending id order.
    pub fn nodes_at_level(&self, level: u32) -> Vec<NodeId> {
        (0..self.num_nodes())
            .filter(|&idx| self.node_level[idx] == level)
            .map(|idx| NodeId::from_raw(idx as u32))
            .collect()
    }

    /// Renumbers nodes in level order (ties broken by current id), so that
    /// a level-ordered forward sweep visits node ids monotonically and
    /// sequential access replaces the scattered access a random topological
    /// order would otherwise cause.
    ///
    /// Requires [`TimingGraph::levelize`] to have run since the last
    /// structural change. Returns the old id → new id remapping (indexed by
    /// old [`NodeId::as_raw`]) so a caller holding node ids in an external
    /// table (a name resolver, a per-node report cache) can update them.
    pub fn optimize_node_layout(&mut self) -> EstaResult<Vec<NodeId>> {
        if !self.levelized {
            return Err(EstaError::internal(
                "optimize_node_layout called before levelize",
            ));
        }
        let n = self.num_nodes();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&idx| (self.node_level[idx], idx as u32));

        let mut old_to_new = vec![0u32; n];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx] = new_idx as u32;
        }

        self.node_kind = order.iter().map(|&i| self.node_kind[i]).collect();
        self.node_domain = order.iter().map(|&i| self.node_domain[i]).collect();
        self.node_name = order.iter().map(|&i| self.node_name[i]).collect();
        self.node_func = order.iter().map(|&i| self.node_func[i]).collect();
        self.node_level = order.iter().map(|&i| self.node_level[i]).collect();
        self.node_fanin = order.iter().map(|&i| self.node_fanin[i].clone()).collect();
        self.node_fanout = order
            .iter()
            .map(|&i| self.node_fanout[i].clone())
            .collect();

        for from in self.edge_from.iter_mut() {
            *from = NodeId::from_raw(old_to_new[from.as_raw() as usize]);
        }
        for to in self.edge_to.iter_mut() {
            *to = NodeId::from_raw(old_to_new[to.as_raw() as usize]);
        }

        Ok(old_to_new.into_iter().map(NodeId::from_raw).collect())
    }

    /// Reorders edges so that edges fanning out of lower-level (and, after
    /// [`TimingGraph::optimize_node_layout`], lower-id) nodes come first,
    /// matching the order a forward sweep visits them in. Returns the old id
    /// → new id remapping (indexed by old [`EdgeId::as_raw`]) so a caller
    /// holding edge ids in an external table (a [`crate::DelayTable`], say)
    /// can update them.
    pub fn optimize_edge_layout(&mut self) -> Vec<EdgeId> {
        let m = self.num_edges();
        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by_key(|&idx| self.edge_from[idx].as_raw());

        let mut old_to_new = vec![0u32; m];
        for (new_idx, &old_idx) in order.iter().enumerate() {
            old_to_new[old_idx] = new_idx as u32;
        }

        self.edge_kind = order.iter().map(|&i| self.edge_kind[i]).collect();
        self.edge_from = order.iter().map(|&i| self.edge_from[i]).collect();
        self.edge_to = order.iter().map(|&i| self.edge_to[i]).collect();

        for fanin in self.node_fanin.iter_mut() {
            for edge in fanin.iter_mut() {
                *edge = EdgeId::from_raw(old_to_new[edge.as_raw() as usize]);
            }
        }
        for fanout in self.node_fanout.iter_mut() {
            for edge in fanout.iter_mut() {
                *edge = EdgeId::from_raw(old_to_new[edge.as_raw() as usize]);
            }
        }

        old_to_new.into_iter().map(EdgeId::from_raw).collect()
    }
}
