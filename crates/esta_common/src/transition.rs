//! The transition-type alphabet shared by the graph, tag, BDD, and
//! propagation crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A signal transition, as observed at a single pin.
///
/// `Rise`, `Fall`, `High`, `Low` are the "event" alphabet produced by
/// ordinary data propagation; `Clock` flows only along flip-flop clock
/// paths; `Max` marks a tag that has been re-tagged during circuit-max
/// aggregation and no longer corresponds to a concrete switching event.
///
/// Declaration order is the lexicographic order the CSV exhaustive dump
/// (spec §6) iterates primary-input transition vectors in: `Rise < Fall <
/// High < Low`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Transition {
    /// 0 → 1.
    Rise,
    /// 1 → 0.
    Fall,
    /// 1 → 1 (settled high, no switching).
    High,
    /// 0 → 0 (settled low, no switching).
    Low,
    /// A clock edge; carried only on clock-fanout edges.
    Clock,
    /// An aggregation marker used by circuit-max tags; matches any
    /// transition of the same clock domain under the tag-store match
    /// predicate.
    Max,
    /// Not yet determined / not applicable.
    Unknown,
}

impl Transition {
    /// The four "event" transitions primary inputs and ordinary data
    /// propagation produce, in the CSV lexicographic order.
    pub const EVENTS: [Transition; 4] = [
        Transition::Rise,
        Transition::Fall,
        Transition::High,
        Transition::Low,
    ];

    /// The transition's logic value at its start, `1` for `{High, Fall}`.
    pub fn initial_value(self) -> bool {
        matches!(self, Transition::High | Transition::Fall)
    }

    /// The transition's logic value at its end, `1` for `{High, Rise}`.
    pub fn final_value(self) -> bool {
        matches!(self, Transition::High | Transition::Rise)
    }

    /// Classifies an (initial, final) logic-value pair into a `Transition`
    /// per spec §4.4.3's table.
    pub fn from_initial_final(initial: bool, final_: bool) -> Transition {
        match (initial, final_) {
            (false, false) => Transition::Low,
            (true, true) => Transition::High,
            (false, true) => Transition::Rise,
            (true, false) => Transition::Fall,
        }
    }

    /// `true` for `{Rise, Fall}`: the transition actually switches.
    pub fn is_dynamic(self) -> bool {
        matches!(self, Transition::Rise | Transition::Fall)
    }

    /// The single-character abbreviation used by the CSV column headers
    /// (`R`, `F`, `H`, `L`).
    pub fn abbrev(self) -> char {
        match self {
            Transition::Rise => 'R',
            Transition::Fall => 'F',
            Transition::High => 'H',
            Transition::Low => 'L',
            Transition::Clock => 'C',
            Transition::Max => 'M',
            Transition::Unknown => 'U',
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::Rise => "Rise",
            Transition::Fall => "Fall",
            Transition::High => "High",
            Transition::Low => "Low",
            Transition::Clock => "Clock",
            Transition::Max => "Max",
            Transition::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order_matches_csv_contract() {
        assert!(Transition::Rise < Transition::Fall);
        assert!(Transition::Fall < Transition::High);
        assert!(Transition::High < Transition::Low);
    }

    #[test]
    fn initial_final_values() {
        assert_eq!(Transition::Rise.initial_value(), false);
        assert_eq!(Transition::Rise.final_value(), true);
        assert_eq!(Transition::Fall.initial_value(), true);
        assert_eq!(Transition::Fall.final_value(), false);
        assert_eq!(Transition::High.initial_value(), true);
        assert_eq!(Transition::High.final_value(), true);
        assert_eq!(Transition::Low.initial_value(), false);
        assert_eq!(Transition::Low.final_value(), false);
    }

    #[test]
    fn from_initial_final_roundtrip() {
        for t in Transition::EVENTS {
            let reconstructed = Transition::from_initial_final(t.initial_value(), t.final_value());
            assert_eq!(reconstructed, t);
        }
    }

    #[test]
    fn is_dynamic() {
        assert!(Transition::Rise.is_dynamic());
        assert!(Transition::Fall.is_dynamic());
        assert!(!Transition::High.is_dynamic());
        assert!(!Transition::Low.is_dynamic());
    }

    #[test]
    fn abbreviations() {
        assert_eq!(Transition::Rise.abbrev(), 'R');
        assert_eq!(Transition::Fall.abbrev(), 'F');
        assert_eq!(Transition::High.abbrev(), 'H');
        assert_eq!(Transition::Low.abbrev(), 'L');
    }

    #[test]
    fn display() {
        assert_eq!(Transition::Clock.to_string(), "Clock");
        assert_eq!(Transition::Max.to_string(), "Max");
    }
}
