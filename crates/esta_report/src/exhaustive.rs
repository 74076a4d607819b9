//! Exhaustive per-input-transition dumps: for every combination of primary
//! input transitions, which output transition and delay it produces at a
//! node.
//!
//! Rather than decoding raw BDD minterms back into transitions (which only
//! has a direct inverse under the two-variable-per-input `Uniform`
//! encoding), this walks the `Transition::EVENTS^num_inputs` combination
//! space directly and, for each combination, asks which tag's `xfunc`
//! implies it. That works under any [`InputEncoding`] and stays exhaustive
//! and disjoint by the same probability-mass invariant the engine already
//! checks after a sweep.

use esta_bdd::{BddFunc, BddManager, InputEncoding, XfuncCache};
use esta_common::Transition;
use esta_engine::xfunc::xfunc;
use esta_graph::NodeId;
use esta_tags::{TagHandle, TagStore};

/// One row of an exhaustive dump: the primary input transitions that
/// produced `output` at `delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustiveRow {
    /// The transition each primary input undergoes, in ascending
    /// primary-input-index order.
    pub inputs: Vec<Transition>,
    /// The transition this combination produces at the dumped node.
    pub output: Transition,
    /// The delay this combination produces at the dumped node.
    pub delay: f64,
}

/// Enumerates every row for `tags`, walking primary input transition
/// combinations in ascending lexicographic order (leftmost input slowest).
pub fn exhaustive_rows(
    mgr: &mut BddManager,
    store: &TagStore,
    cache: &mut XfuncCache<TagHandle>,
    cond_func: &impl Fn(&mut BddManager, NodeId, Transition) -> BddFunc,
    encoding: InputEncoding,
    num_inputs: u32,
    tags: &[TagHandle],
) -> Vec<ExhaustiveRow> {
    let xfuncs: Vec<(TagHandle, BddFunc)> =
        tags.iter().map(|&h| (h, xfunc(mgr, store, cache, cond_func, h))).collect();

    let mut rows = Vec::with_capacity(4usize.pow(num_inputs));
    let mut combo = vec![Transition::Rise; num_inputs as usize];
    walk(mgr, &encoding, &xfuncs, store, &mut combo, 0, &mut rows);
    rows
}

fn walk(
    mgr: &mut BddManager,
    encoding: &InputEncoding,
    xfuncs: &[(TagHandle, BddFunc)],
    store: &TagStore,
    combo: &mut [Transition],
    index: usize,
    rows: &mut Vec<ExhaustiveRow>,
) {
    if index == combo.len() {
        let cube = combo.iter().enumerate().fold(mgr.one(), |acc, (i, &t)| {
            let f = encoding.transition_func(mgr, i as u32, t);
            mgr.and(acc, f)
        });
        if let Some(&(handle, _)) = xfuncs.iter().find(|&&(_, f)| mgr.and(cube, f) == cube) {
            let tag = store.get(handle);
            rows.push(ExhaustiveRow {
                inputs: combo.to_vec(),
                output: tag.transition(),
                delay: tag.arrival(),
            });
        }
        return;
    }
    for &t in &Transition::EVENTS {
        combo[index] = t;
        walk(mgr, encoding, xfuncs, store, combo, index + 1, rows);
    }
}
