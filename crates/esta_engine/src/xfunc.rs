//! `xfunc` construction and memoization (spec §4.5.2): the BDD, over
//! primary-input transition variables, that is true exactly when a tag's
//! switching scenario occurs.

use esta_bdd::{BddFunc, BddManager, InputEncoding, XfuncCache};
use esta_graph::NodeId;
use esta_tags::{TagHandle, TagStore};

/// Builds the `cond_func` for a seed tag launched from `node` undergoing
/// `transition`: the primary-input transition cube for an ordinary primary
/// input or flip-flop source, or the tautology for a constant generator
/// (whose single seeded transition is a fixed 0/1, not a switching event
/// with its own probability mass) or a clock tag (deterministic; carries no
/// switching probability of its own).
pub fn seed_cond_func(
    mgr: &mut BddManager,
    encoding: InputEncoding,
    is_constant_source: &impl Fn(NodeId) -> bool,
    pi_index: &impl Fn(NodeId) -> u32,
    node: NodeId,
    transition: esta_common::Transition,
) -> BddFunc {
    if is_constant_source(node) || transition == esta_common::Transition::Clock {
        mgr.one()
    } else {
        encoding.transition_func(mgr, pi_index(node), transition)
    }
}

/// Builds (and memoizes) the `xfunc` for `handle`: the OR, over the tag's
/// scenarios, of the AND of the `xfunc`s of the input tags each scenario
/// conjoins.
///
/// A tag whose scenario is the single empty conjunction is a seed tag (a
/// primary input, clock source, or constant generator's own base
/// transition, placed there by `esta_engine`'s sweep before propagation
/// begins) — its `xfunc` is given directly by `cond_func`, not the
/// (vacuously true) empty AND the generic recursion would otherwise
/// produce.
pub fn xfunc(
    mgr: &mut BddManager,
    store: &TagStore,
    cache: &mut XfuncCache<TagHandle>,
    cond_func: &impl Fn(&mut BddManager, NodeId, esta_common::Transition) -> BddFunc,
    handle: TagHandle,
) -> BddFunc {
    if let Some(cached) = cache.get(&handle) {
        return cached;
    }
    let tag = store.get(handle);
    let scenarios = tag.scenarios();
    // A seed tag's scenario list is one or more empty conjunctions (a merge of
    // two seeds at the same node, domain, transition and bin concatenates
    // their empty conjunctions rather than collapsing them); either way its
    // xfunc is the seed's own cond_func, not the vacuous tautology the empty
    // conjunctions would otherwise produce.
    let result = if scenarios.iter().all(|c| c.is_empty()) {
        cond_func(mgr, tag.launch_node(), tag.transition())
    } else {
        let mut acc = mgr.zero();
        for conjunction in scenarios {
            let mut term = mgr.one();
            for &input_handle in conjunction {
                let sub = xfunc(mgr, store, cache, cond_func, input_handle);
                term = mgr.and(term, sub);
            }
            acc = mgr.or(acc, term);
        }
        acc
    };
    cache.insert(handle, result);
    result
}
