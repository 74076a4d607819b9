//! The next-state transition filter (spec §4.4.2 step 4): for one
//! permutation's fanin tags, identify which fanin positions are logically
//! redundant given the *already-arrived* inputs, in ascending arrival
//! order, so the filtered position's tag can be dropped from the candidate
//! tag's conjunction before it is merged into the node's tag set.
//!
//! A position is redundant once the function, restricted by the final
//! logic value of every earlier-arriving position, no longer depends on
//! it: its positive and negative cofactors (with respect to that
//! position's own variable) are then structurally identical. Grounded on
//! `original_source/src/base/transition_filters.hpp`'s
//! `NextStateTransitionFilter::identify_filtered_tags`.

use esta_bdd::{BddFunc, BddManager, Var};
use esta_common::Transition;

/// Returns the fanin positions (indices into `arrivals`/`transitions`, one
/// pair per position, aligned with `func`'s variable numbering) that the
/// next-state filter proves redundant: walking positions in ascending
/// arrival order, restricting `func` by each already-arrived position's
/// final logic value before testing the next position's cofactors.
pub fn filtered_positions(
    mgr: &mut BddManager,
    func: BddFunc,
    arrivals: &[f64],
    transitions: &[Transition],
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..arrivals.len()).collect();
    order.sort_by(|&a, &b| arrivals[a].partial_cmp(&arrivals[b]).unwrap());

    let mut known: Vec<Option<bool>> = vec![None; arrivals.len()];
    let mut filtered = Vec::new();
    for &i in &order {
        let mut f = func;
        for (j, value) in known.iter().enumerate() {
            if let Some(v) = *value {
                f = mgr.restrict(f, j as Var, v);
            }
        }
        let f0 = mgr.restrict(f, i as Var, false);
        let f1 = mgr.restrict(f, i as Var, true);
        if f0 == f1 {
            filtered.push(i);
        }
        known[i] = Some(transitions[i].final_value());
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_gate_low_on_first_arrival_filters_the_later_input() {
        // y = a & b; a arrives first and is Low, fixing y = 0 regardless of b.
        let mut mgr = BddManager::new();
        let a = mgr.var(0);
        let b = mgr.var(1);
        let func = mgr.and(a, b);
        let filtered = filtered_positions(
            &mut mgr,
            func,
            &[0.0, 1.0],
            &[Transition::Low, Transition::Rise],
        );
        assert_eq!(filtered, vec![1]);
    }

    #[test]
    fn and_gate_high_on_first_arrival_does_not_filter_the_later_input() {
        let mut mgr = BddManager::new();
        let a = mgr.var(0);
        let b = mgr.var(1);
        let func = mgr.and(a, b);
        let filtered = filtered_positions(
            &mut mgr,
            func,
            &[0.0, 1.0],
            &[Transition::High, Transition::Rise],
        );
        assert!(filtered.is_empty());
    }

    #[test]
    fn arrival_order_matters_not_fanin_order() {
        // Same AND gate, but b (index 1) arrives first this time.
        let mut mgr = BddManager::new();
        let a = mgr.var(0);
        let b = mgr.var(1);
        let func = mgr.and(a, b);
        let filtered = filtered_positions(
            &mut mgr,
            func,
            &[1.0, 0.0],
            &[Transition::Rise, Transition::Low],
        );
        assert_eq!(filtered, vec![0]);
    }

    #[test]
    fn or_gate_high_on_first_arrival_filters_the_later_input() {
        let mut mgr = BddManager::new();
        let a = mgr.var(0);
        let b = mgr.var(1);
        let func = mgr.or(a, b);
        let filtered = filtered_positions(
            &mut mgr,
            func,
            &[0.0, 1.0],
            &[Transition::High, Transition::Fall],
        );
        assert_eq!(filtered, vec![1]);
    }

    #[test]
    fn function_ignoring_a_variable_always_filters_it() {
        let mut mgr = BddManager::new();
        let a = mgr.var(0);
        let _b = mgr.var(1);
        let filtered =
            filtered_positions(&mut mgr, a, &[0.0, 1.0], &[Transition::Rise, Transition::Fall]);
        assert_eq!(filtered, vec![1]);
    }

    #[test]
    fn three_input_and_filters_remaining_once_one_is_low() {
        let mut mgr = BddManager::new();
        let a = mgr.var(0);
        let b = mgr.var(1);
        let c = mgr.var(2);
        let ab = mgr.and(a, b);
        let func = mgr.and(ab, c);
        let filtered = filtered_positions(
            &mut mgr,
            func,
            &[0.0, 1.0, 2.0],
            &[Transition::Low, Transition::Rise, Transition::Fall],
        );
        assert_eq!(filtered, vec![1, 2]);
    }
}
