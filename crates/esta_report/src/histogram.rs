//! Per-node and circuit-max delay/probability histograms: aggregate a set
//! of tags by arrival time, summing each tag's switching probability into a
//! `delay -> probability` table.

use esta_bdd::{BddFunc, BddManager, XfuncCache};
use esta_common::Transition;
use esta_engine::xfunc::xfunc;
use esta_engine::CircuitMaxEntry;
use esta_graph::NodeId;
use esta_tags::{TagHandle, TagStore};

/// One `(delay, probability)` row of a histogram, delays in ascending order.
pub type Histogram = Vec<(f64, f64)>;

fn insert(rows: &mut Histogram, delay: f64, probability: f64) {
    match rows.iter_mut().find(|(d, _)| *d == delay) {
        Some((_, p)) => *p += probability,
        None => rows.push((delay, probability)),
    }
}

fn sorted(mut rows: Histogram) -> Histogram {
    rows.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("arrival times are never NaN"));
    rows
}

/// Builds the delay histogram for a node's data tags: for each tag, adds
/// its switching probability (the `xfunc` measure) into the bucket for its
/// arrival time, merging tags that happen to share an arrival.
pub fn node_histogram(
    mgr: &mut BddManager,
    store: &TagStore,
    cache: &mut XfuncCache<TagHandle>,
    cond_func: &impl Fn(&mut BddManager, NodeId, Transition) -> BddFunc,
    tags: &[TagHandle],
) -> Histogram {
    let mut rows = Histogram::new();
    for &handle in tags {
        let tag = store.get(handle);
        let f = xfunc(mgr, store, cache, cond_func, handle);
        let probability = mgr.minterm_fraction(f);
        insert(&mut rows, tag.arrival(), probability);
    }
    sorted(rows)
}

/// Builds the circuit-max delay histogram from an already-computed
/// distribution, inserting a zero-probability `0.0` row when no candidate
/// happens to land there (so a delay histogram always has a start point to
/// plot from).
pub fn circuit_max_histogram(store: &TagStore, entries: &[CircuitMaxEntry]) -> Histogram {
    let mut rows = Histogram::new();
    for entry in entries {
        let delay = store.get(entry.tag).arrival();
        insert(&mut rows, delay, entry.probability);
    }
    if !rows.iter().any(|(d, _)| *d == 0.0) {
        rows.push((0.0, 0.0));
    }
    sorted(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use esta_bdd::InputEncoding;
    use esta_config::types::{BinPolicy, CondFunc};
    use esta_engine::xfunc::seed_cond_func;
    use esta_graph::DomainId;
    use esta_tags::{ExtTimingTag, TagKind};

    fn pi_index_identity(node: NodeId) -> u32 {
        node.as_raw()
    }

    #[test]
    fn merges_tags_sharing_an_arrival() {
        let mut mgr = BddManager::new();
        let encoding = InputEncoding::from(CondFunc::Uniform);
        let mut store = TagStore::new(1);
        let node = NodeId::from_raw(0);
        let a = store.insert(
            node,
            TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), node, Transition::Rise, 1.0),
            &BinPolicy::None,
            0.0,
        );
        let b = store.insert(
            node,
            TagKind::Data,
            ExtTimingTag::seed(DomainId::from_raw(0), node, Transition::Fall, 1.0),
            &BinPolicy::None,
            0.0,
        );
        let mut cache = XfuncCache::new(0);
        let cond = |mgr: &mut BddManager, n: NodeId, t: Transition| {
            seed_cond_func(mgr, encoding, &|_| false, &pi_index_identity, n, t)
        };
        let rows = node_histogram(&mut mgr, &store, &mut cache, &cond, &[a, b]);
        assert_eq!(rows.len(), 1);
        assert!((rows[0].0 - 1.0).abs() < 1e-12);
        assert!((rows[0].1 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn circuit_max_histogram_inserts_zero_delay_floor() {
        let store = TagStore::new(1);
        let rows = circuit_max_histogram(&store, &[]);
        assert_eq!(rows, vec![(0.0, 0.0)]);
    }
}
