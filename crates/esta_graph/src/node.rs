//! The closed set of timing-graph node kinds (spec §3.2).

use serde::{Deserialize, Serialize};

/// The role a node plays in the timing graph.
///
/// Closed per the spec: every node is exactly one of these, and the kind is
/// fixed at construction — it is never inferred later from edge shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum NodeKind {
    /// The source of a primary input pad's combinational fanout.
    InpadSource,
    /// The source of a flip-flop's `Q` fanout (a launch point).
    FfSource,
    /// The source of a clock network fed by a primary clock pin.
    ClockSource,
    /// The source of a tied-off constant net.
    ConstantGenSource,
    /// A primary input pad's output pin.
    InpadOpin,
    /// A primary output pad's input pin.
    OutpadIpin,
    /// A combinational primitive's input pin.
    PrimitiveIpin,
    /// A combinational primitive's output pin.
    PrimitiveOpin,
    /// A flip-flop's data input pin.
    FfIpin,
    /// A flip-flop's `Q` output pin.
    FfOpin,
    /// A flip-flop's clock pin.
    FfClock,
    /// A clock buffer/network output pin.
    ClockOpin,
    /// A primary output pad's sink (terminal node, no fanout).
    OutpadSink,
    /// A flip-flop's data input sink as seen from the clock domain it
    /// launches into (terminal node on the data side).
    FfSink,
}

impl NodeKind {
    /// `true` for the three node kinds that originate a clock domain
    /// (primary clock pins and tied-off constants, which are domain-less but
    /// still have no upstream timing arc).
    pub fn is_source(self) -> bool {
        matches!(
            self,
            NodeKind::InpadSource
                | NodeKind::FfSource
                | NodeKind::ClockSource
                | NodeKind::ConstantGenSource
        )
    }

    /// `true` for terminal nodes: no node may have an edge fanning out of
    /// one of these.
    pub fn is_sink(self) -> bool {
        matches!(self, NodeKind::OutpadSink | NodeKind::FfSink)
    }

    /// `true` if this node carries a Boolean function over its fanin (i.e.
    /// is eligible for `TimingGraph::set_node_func`).
    ///
    /// `FfOpin` is deliberately excluded: a flip-flop's `Q` output is not a
    /// combinational function of its immediate fanin (that would require
    /// modeling the captured state across clock cycles, out of scope here).
    /// Its transition is instead treated as an independent per-capture
    /// event, the same way a primary input is — see `esta_engine`'s
    /// sequential-boundary handling.
    ///
    /// `ConstantGenSource` carries a (nullary) function too: the constant
    /// `0`/`1` it is tied off to, used to pick which single transition the
    /// sweep seeds there.
    pub fn carries_function(self) -> bool {
        matches!(self, NodeKind::PrimitiveOpin | NodeKind::ConstantGenSource)
    }
}
