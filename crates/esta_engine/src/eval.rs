//! Output transition evaluation (spec §4.4.3): given a node's Boolean
//! function and the transition observed at each fanin, compute the
//! transition produced at the node's output by restricting the function at
//! the initial and final logic value of every fanin in turn.

use esta_bdd::{BddFunc, BddManager, Var};
use esta_common::Transition;

/// Evaluates the transition a node's output undergoes given the per-fanin
/// input transitions, by cofactor-restricting `func` on the node's function
/// support.
///
/// `input_transitions[i]` is the transition observed at the fanin occupying
/// variable index `i` of `func` — the same indexing `TimingGraph::fanin`
/// assigns when a node's function is built. Restriction is a no-op for any
/// variable `func` does not depend on, so only the node's actual support
/// affects the result even though every fanin is passed in.
pub fn evaluate_output_transition(
    mgr: &mut BddManager,
    func: BddFunc,
    input_transitions: &[Transition],
) -> Transition {
    let initial = restrict_all(mgr, func, input_transitions, Transition::initial_value);
    let final_ = restrict_all(mgr, func, input_transitions, Transition::final_value);
    Transition::from_initial_final(initial, final_)
}

fn restrict_all(
    mgr: &mut BddManager,
    func: BddFunc,
    input_transitions: &[Transition],
    pick: fn(Transition) -> bool,
) -> bool {
    let mut f = func;
    for (i, &t) in input_transitions.iter().enumerate() {
        f = mgr.restrict(f, i as Var, pick(t));
    }
    debug_assert!(f.is_terminal(), "function not fully restricted by its own support");
    f.is_true()
}
