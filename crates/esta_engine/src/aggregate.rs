//! Circuit-max aggregation (spec §4.4.4): given a set of candidate tags
//! (for one clock domain, drawn from every primary output / flip-flop data
//! sink), compute each tag's probability of being the realized circuit
//! maximum — the tag with the greatest arrival among those whose scenario
//! is active in a given switching instant.

use esta_bdd::{BddFunc, BddManager, XfuncCache};
use esta_common::{EstaResult, Transition};
use esta_graph::NodeId;
use esta_tags::{TagHandle, TagStore};

use crate::xfunc::xfunc;

/// One candidate tag's contribution to the circuit-max distribution.
#[derive(Clone, Copy, Debug)]
pub struct CircuitMaxEntry {
    /// The candidate tag.
    pub tag: TagHandle,
    /// The probability that this tag is the realized circuit maximum.
    pub probability: f64,
}

/// Computes the circuit-max probability distribution over `candidates`
/// (which need not be pre-sorted or pre-deduplicated).
///
/// Tags are processed from greatest to least arrival. A tag's probability
/// is the measure of "its scenario is active, and no strictly-greater
/// arrival tag's scenario is also active" — the event that *this* tag is
/// the one actually observed as the circuit's maximum delay. When
/// `infer_last_max_probability` is set, the least-arrival candidate skips
/// this (expensive) direct computation and instead takes
/// `1 - sum(every other candidate's probability)`, trading away the
/// ability to cross-check that tag's probability mass independently.
pub fn circuit_max_probabilities(
    mgr: &mut BddManager,
    store: &TagStore,
    cache: &mut XfuncCache<TagHandle>,
    cond_func: &impl Fn(&mut BddManager, NodeId, Transition) -> BddFunc,
    candidates: &[TagHandle],
    infer_last_max_probability: bool,
) -> EstaResult<Vec<CircuitMaxEntry>> {
    let mut sorted: Vec<TagHandle> = candidates.to_vec();
    sorted.sort_by(|&a, &b| {
        store
            .get(b)
            .arrival()
            .partial_cmp(&store.get(a).arrival())
            .expect("arrival times are never NaN")
    });

    let mut covered = mgr.zero();
    let mut entries = Vec::with_capacity(sorted.len());
    let n = sorted.len();
    for (i, &handle) in sorted.iter().enumerate() {
        let f = xfunc(mgr, store, cache, cond_func, handle);
        let is_last = i == n - 1;
        let probability = if is_last && infer_last_max_probability {
            let sum_others: f64 = entries.iter().map(|e: &CircuitMaxEntry| e.probability).sum();
            (1.0 - sum_others).max(0.0)
        } else {
            let not_covered = mgr.not(covered);
            let effective = mgr.and(f, not_covered);
            mgr.minterm_fraction(effective)
        };
        entries.push(CircuitMaxEntry {
            tag: handle,
            probability,
        });
        covered = mgr.or(covered, f);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esta_bdd::InputEncoding;
    use esta_common::Transition;
    use esta_config::types::{BinPolicy, CondFunc};
    use esta_graph::DomainId;
    use esta_tags::ExtTimingTag;

    fn pi_index_identity(node: NodeId) -> u32 {
        node.as_raw()
    }

    fn cond_func(mgr: &mut BddManager, encoding: InputEncoding, node: NodeId, t: Transition) -> BddFunc {
        crate::xfunc::seed_cond_func(mgr, encoding, &|_| false, &pi_index_identity, node, t)
    }

    #[test]
    fn disjoint_candidates_sum_to_their_own_fraction() {
        let mut mgr = BddManager::new();
        let encoding = InputEncoding::from(CondFunc::Uniform);
        let mut store = TagStore::new(2);
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);
        let policy = BinPolicy::None;
        let ta = store.insert(
            a,
            esta_tags::TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), a, Transition::Rise, 2.0),
            &policy,
            0.0,
        );
        let tb = store.insert(
            b,
            esta_tags::TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), b, Transition::Fall, 1.0),
            &policy,
            0.0,
        );
        let mut cache = XfuncCache::new(0);
        let cond = |mgr: &mut BddManager, node: NodeId, t: Transition| cond_func(mgr, encoding, node, t);
        let entries = circuit_max_probabilities(
            &mut mgr,
            &store,
            &mut cache,
            &cond,
            &[ta, tb],
            false,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        // ta has the higher arrival (2.0) so it is processed first and its
        // probability equals its own 1/4 xfunc measure uncontested.
        assert!((entries[0].probability - 0.25).abs() < 1e-9);
        let total: f64 = entries.iter().map(|e| e.probability).sum();
        assert!(total <= 1.0 + 1e-9);
    }

    #[test]
    fn infer_last_uses_complement_of_sum() {
        let mut mgr = BddManager::new();
        let encoding = InputEncoding::from(CondFunc::Uniform);
        let mut store = TagStore::new(2);
        let a = NodeId::from_raw(0);
        let b = NodeId::from_raw(1);
        let policy = BinPolicy::None;
        let ta = store.insert(
            a,
            esta_tags::TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), a, Transition::Rise, 2.0),
            &policy,
            0.0,
        );
        let tb = store.insert(
            b,
            esta_tags::TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), b, Transition::Fall, 1.0),
            &policy,
            0.0,
        );
        let mut cache = XfuncCache::new(0);
        let cond = |mgr: &mut BddManager, node: NodeId, t: Transition| cond_func(mgr, encoding, node, t);
        let entries = circuit_max_probabilities(
            &mut mgr,
            &store,
            &mut cache,
            &cond,
            &[ta, tb],
            true,
        )
        .unwrap();
        assert!((entries[0].probability - 0.25).abs() < 1e-9);
        assert!((entries[1].probability - 0.75).abs() < 1e-9);
    }

    #[test]
    fn single_candidate_gets_full_measure() {
        let mut mgr = BddManager::new();
        let encoding = InputEncoding::from(CondFunc::Uniform);
        let mut store = TagStore::new(1);
        let a = NodeId::from_raw(0);
        let ta = store.insert(
            a,
            esta_tags::TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), a, Transition::Rise, 2.0),
            &BinPolicy::None,
            0.0,
        );
        let mut cache = XfuncCache::new(0);
        let cond = |mgr: &mut BddManager, node: NodeId, t: Transition| cond_func(mgr, encoding, node, t);
        let entries = circuit_max_probabilities(
            &mut mgr,
            &store,
            &mut cache,
            &cond,
            &[ta],
            false,
        )
        .unwrap();
        assert!((entries[0].probability - 0.25).abs() < 1e-9);
    }
}
