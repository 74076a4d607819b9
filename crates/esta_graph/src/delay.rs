//! The delay table (component C2): a read-only
//! `(edge, input_transition, output_transition) -> delay` map.

use std::collections::HashMap;

use esta_common::{EstaError, EstaResult, Transition};

use crate::ids::EdgeId;

/// A read-only per-edge delay lookup.
///
/// Every `Clock` output transition resolves to `0.0` without a table entry
/// (clock paths are not characterized against a standard-cell delay model in
/// this analysis). Every other `(edge, output_transition)` pair must have
/// been populated by [`DelayTable::set_delay`] before lookup, or
/// [`DelayTable::edge_delay`] returns [`EstaError::UnmodeledDelay`].
#[derive(Debug, Default, Clone)]
pub struct DelayTable {
    entries: HashMap<(EdgeId, Transition, Transition), f64>,
}

impl DelayTable {
    /// Creates an empty delay table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the delay for `edge` going from `input_transition` to
    /// `output_transition`.
    pub fn set_delay(
        &mut self,
        edge: EdgeId,
        input_transition: Transition,
        output_transition: Transition,
        delay: f64,
    ) {
        self.entries
            .insert((edge, input_transition, output_transition), delay);
    }

    /// Looks up the delay for `edge` given the transition observed at its
    /// input and the transition produced at its output.
    ///
    /// A `Clock` transition on either side is always `0.0`, regardless of
    /// whether an entry was ever recorded. Any other pair with no recorded
    /// entry is a fatal [`EstaError::UnmodeledDelay`].
    pub fn edge_delay(
        &self,
        edge: EdgeId,
        input_transition: Transition,
        output_transition: Transition,
    ) -> EstaResult<f64> {
        if output_transition == Transition::Clock || input_transition == Transition::Clock {
            return Ok(0.0);
        }
        self.entries
            .get(&(edge, input_transition, output_transition))
            .copied()
            .ok_or_else(|| EstaError::UnmodeledDelay {
                edge: edge.as_raw(),
                input_transition: input_transition.to_string(),
                output_transition: output_transition.to_string(),
            })
    }

    /// The number of recorded `(edge, input, output)` entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
