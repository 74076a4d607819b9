//! The closed set of timing-graph edge kinds (spec §3.3) and their
//! derivation from the `NodeKind` pair at each endpoint.

use serde::{Deserialize, Serialize};

use crate::node::NodeKind;
use esta_common::{EstaError, EstaResult};

/// The role an edge plays in the timing graph.
///
/// Closed: every edge is exactly one of these nine kinds, derived
/// deterministically from its endpoints' [`NodeKind`]s via
/// [`EdgeKind::derive`] rather than chosen freely by a builder.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum EdgeKind {
    /// An ordinary combinational interconnect: an output pin to a fanout
    /// input pin, possibly of a different primitive.
    NetEdge,
    /// A primitive's internal input-pin-to-output-pin timing arc.
    PrimitiveInternal,
    /// A flip-flop's clock pin to its launch source, establishing the
    /// launched clock domain. Always zero delay: a `Clock`-involved lookup
    /// resolves to `0.0` in the delay table regardless of any entry (spec
    /// §4.2), so the launched `Q` transition starts exactly at the clock
    /// tag's own arrival.
    FfClockToSourceInternal,
    /// A flip-flop's launch source to its `Q` output pin: carries the
    /// clock-to-`Q` propagation delay (possibly zero, depending on the
    /// characterized cell).
    FfSourceToOpinInternal,
    /// A flip-flop's `D` input pin to its capture sink (zero delay; a
    /// setup-time checkpoint, not a propagation arc).
    FfIpinToSinkInternal,
    /// A flip-flop's clock pin to its capture sink (zero delay; a
    /// hold-time reference arc).
    FfClockToSinkInternal,
    /// A primary I/O pad's source-to-pin or pin-to-sink internal arc (zero
    /// delay).
    PadInternal,
    /// A clock network source to its output pin (zero delay).
    ClockSourceInternal,
    /// A tied-off constant generator to its fanout net.
    Constant,
}

impl EdgeKind {
    /// Derives the edge kind from the `NodeKind` of its `(from, to)`
    /// endpoints. Returns `MalformedGraph` for any pairing the closed edge
    /// taxonomy does not recognize.
    pub fn derive(from: NodeKind, to: NodeKind) -> EstaResult<EdgeKind> {
        use NodeKind::*;
        let kind = match (from, to) {
            (InpadSource, InpadOpin) => EdgeKind::PadInternal,
            (OutpadIpin, OutpadSink) => EdgeKind::PadInternal,
            (ClockSource, ClockOpin) => EdgeKind::ClockSourceInternal,
            (ConstantGenSource, _) => EdgeKind::Constant,
            (FfClock, FfSource) => EdgeKind::FfClockToSourceInternal,
            (FfSource, FfOpin) => EdgeKind::FfSourceToOpinInternal,
            (FfIpin, FfSink) => EdgeKind::FfIpinToSinkInternal,
            (FfClock, FfSink) => EdgeKind::FfClockToSinkInternal,
            (PrimitiveIpin, PrimitiveOpin) => EdgeKind::PrimitiveInternal,
            (InpadOpin, _) | (PrimitiveOpin, _) | (FfOpin, _) | (ClockOpin, _) => {
                EdgeKind::NetEdge
            }
            _ => {
                return Err(EstaError::MalformedGraph {
                    detail: format!("no edge kind connects {from:?} -> {to:?}"),
                    node: None,
                    edge: None,
                })
            }
        };
        Ok(kind)
    }

    /// `true` for the internal, zero-delay bookkeeping arcs that never carry
    /// a real propagation delay (looked up in the delay table as exactly
    /// `0.0` for every transition, never as an `UnmodeledDelay` error).
    pub fn is_zero_delay_internal(self) -> bool {
        matches!(
            self,
            EdgeKind::FfClockToSourceInternal
                | EdgeKind::FfIpinToSinkInternal
                | EdgeKind::FfClockToSinkInternal
                | EdgeKind::PadInternal
                | EdgeKind::ClockSourceInternal
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esta_common::EstaError;

    #[test]
    fn net_edge_derives_from_primitive_opin_fanout() {
        assert_eq!(
            EdgeKind::derive(NodeKind::PrimitiveOpin, NodeKind::PrimitiveIpin).unwrap(),
            EdgeKind::NetEdge
        );
    }

    #[test]
    fn primitive_internal_derives_from_ipin_to_opin() {
        assert_eq!(
            EdgeKind::derive(NodeKind::PrimitiveIpin, NodeKind::PrimitiveOpin).unwrap(),
            EdgeKind::PrimitiveInternal
        );
    }

    #[test]
    fn ff_internal_kinds() {
        assert_eq!(
            EdgeKind::derive(NodeKind::FfClock, NodeKind::FfSource).unwrap(),
            EdgeKind::FfClockToSourceInternal
        );
        assert_eq!(
            EdgeKind::derive(NodeKind::FfSource, NodeKind::FfOpin).unwrap(),
            EdgeKind::FfSourceToOpinInternal
        );
        assert_eq!(
            EdgeKind::derive(NodeKind::FfIpin, NodeKind::FfSink).unwrap(),
            EdgeKind::FfIpinToSinkInternal
        );
        assert_eq!(
            EdgeKind::derive(NodeKind::FfClock, NodeKind::FfSink).unwrap(),
            EdgeKind::FfClockToSinkInternal
        );
    }

    #[test]
    fn unrecognized_pairing_is_malformed_graph() {
        let err = EdgeKind::derive(NodeKind::OutpadSink, NodeKind::InpadSource).unwrap_err();
        assert!(matches!(err, EstaError::MalformedGraph { .. }));
    }

    #[test]
    fn zero_delay_internal_excludes_primitive_and_net() {
        assert!(!EdgeKind::PrimitiveInternal.is_zero_delay_internal());
        assert!(!EdgeKind::NetEdge.is_zero_delay_internal());
        assert!(EdgeKind::PadInternal.is_zero_delay_internal());
    }
}
