//! The propagation engine (component C4): seeds a levelized timing graph,
//! runs the forward sweep, checks the probability-mass invariant every
//! node's data tags must satisfy, and aggregates the circuit-max
//! probability distribution per clock domain.

#![warn(missing_docs)]

pub mod aggregate;
pub mod eval;
pub mod filter;
pub mod permutation;
pub mod sweep;
pub mod xfunc;

use std::collections::{HashMap, HashSet};

use esta_bdd::{BddManager, InputEncoding, XfuncCache};
use esta_common::{EstaError, EstaResult, Transition};
use esta_config::types::EstaConfig;
use esta_diagnostics::Observer;
use esta_graph::{DelayTable, DomainId, NodeId, NodeKind, TimingGraph};
use esta_tags::{ExtTimingTag, TagHandle, TagKind, TagStore};

pub use aggregate::CircuitMaxEntry;

/// The full result of running an analysis over one timing graph.
pub struct AnalysisResult {
    /// The tag store populated by the forward sweep: every node's clock and
    /// data tags, as they stood once propagation finished.
    pub store: TagStore,
    /// The auxiliary store holding each domain's retagged-to-`Max`
    /// circuit-max candidate tags (see [`build_circuit_max_candidates`]).
    pub max_store: TagStore,
    /// The circuit-max probability distribution for every clock domain that
    /// had at least one sink tag.
    pub circuit_max: HashMap<DomainId, Vec<CircuitMaxEntry>>,
}

/// Runs the full analysis pipeline: forward sweep, probability-mass check,
/// circuit-max aggregation.
///
/// `graph` is levelized first if it is not already. `sta_critical_delay` is
/// the precomputed classical-STA critical-path delay `D*`, consulted only
/// by [`esta_config::types::BinPolicy::StaSlack`].
pub fn run_analysis(
    graph: &mut TimingGraph,
    delays: &DelayTable,
    config: &EstaConfig,
    observer: &dyn Observer,
    sta_critical_delay: f64,
) -> EstaResult<AnalysisResult> {
    if !graph.is_levelized() {
        graph.levelize()?;
    }
    let store = sweep::run_forward_sweep(graph, delays, config, observer, sta_critical_delay)?;

    let pi_index = build_pi_index(graph)?;
    let constant_sources = build_constant_source_set(graph)?;
    let encoding = InputEncoding::from(config.cond_func);
    let pi_index_fn = move |node: NodeId| *pi_index.get(&node).expect("every launch node has a PI slot");
    let is_constant_fn = move |node: NodeId| constant_sources.contains(&node);
    let cond = move |mgr: &mut BddManager, node: NodeId, t: Transition| {
        xfunc::seed_cond_func(mgr, encoding, &is_constant_fn, &pi_index_fn, node, t)
    };

    let mut mgr = BddManager::new();
    let mut cache = XfuncCache::new(config.xfunc_cache_capacity);
    check_probability_mass(&mut mgr, graph, &store, &mut cache, &cond)?;

    let (max_store, candidates_by_domain) =
        build_circuit_max_candidates(graph, &store, config, sta_critical_delay)?;
    let mut max_cache = XfuncCache::new(config.xfunc_cache_capacity);
    let mut circuit_max = HashMap::new();
    for (domain, handles) in candidates_by_domain {
        let entries = aggregate::circuit_max_probabilities(
            &mut mgr,
            &max_store,
            &mut max_cache,
            &cond,
            &handles,
            config.infer_last_max_probability,
        )?;
        circuit_max.insert(domain, entries);
    }

    Ok(AnalysisResult {
        store,
        max_store,
        circuit_max,
    })
}

/// Assigns each `InpadSource` and `FfSource` node its own primary-input-like
/// BDD variable index, in ascending node order. Every other node kind's
/// seed tags resolve through [`xfunc::seed_cond_func`]'s constant/clock
/// special cases instead of this map.
///
/// Exposed so callers building their own `cond_func` closure outside
/// [`run_analysis`] (a report tool re-deriving a tag's `xfunc` after the
/// fact, say) can reproduce the same primary-input variable assignment.
pub fn build_pi_index(graph: &TimingGraph) -> EstaResult<HashMap<NodeId, u32>> {
    let mut map = HashMap::new();
    let mut next = 0u32;
    for idx in 0..graph.num_nodes() {
        let node = NodeId::from_raw(idx as u32);
        if matches!(
            graph.node_kind(node)?,
            NodeKind::InpadSource | NodeKind::FfSource
        ) {
            map.insert(node, next);
            next += 1;
        }
    }
    Ok(map)
}

fn build_constant_source_set(graph: &TimingGraph) -> EstaResult<HashSet<NodeId>> {
    let mut set = HashSet::new();
    for idx in 0..graph.num_nodes() {
        let node = NodeId::from_raw(idx as u32);
        if graph.node_kind(node)? == NodeKind::ConstantGenSource {
            set.insert(node);
        }
    }
    Ok(set)
}

/// Verifies that every node's data tags partition the full primary-input
/// switching space: their `xfunc` measures must sum to `1` within `1e-9`
/// (spec's probability-completeness testable property).
fn check_probability_mass(
    mgr: &mut BddManager,
    graph: &TimingGraph,
    store: &TagStore,
    cache: &mut XfuncCache<TagHandle>,
    cond_func: &impl Fn(&mut BddManager, NodeId, Transition) -> esta_bdd::BddFunc,
) -> EstaResult<()> {
    const TOLERANCE: f64 = 1e-9;
    for idx in 0..graph.num_nodes() {
        let node = NodeId::from_raw(idx as u32);
        let tags = store.data_tags(node);
        if tags.is_empty() {
            continue;
        }
        let mut sum = 0.0;
        for &handle in tags {
            let f = xfunc::xfunc(mgr, store, cache, cond_func, handle);
            sum += mgr.minterm_fraction(f);
        }
        if (sum - 1.0).abs() > TOLERANCE {
            return Err(EstaError::ProbabilityMassViolation {
                node: node.as_raw(),
                sum,
                tolerance: TOLERANCE,
            });
        }
    }
    Ok(())
}

/// Builds the global circuit-max candidate set (spec §4.4.4): every
/// primary-output / flip-flop sink's data tags, copied with their
/// transition overwritten to [`Transition::Max`] and merged — by the tag
/// store's usual `(domain, transition, delay-bin)` match predicate, which
/// treats an incoming `Max` tag as matching any transition already on
/// file for its domain — into one candidate list per clock domain.
///
/// Every candidate tag is inserted under a single shared slot (node index
/// `0` of the returned store): the match predicate discriminates on
/// `domain`, not on which graph node the tag happens to be stored at, so
/// sharing a slot across every domain is exactly as precise as keeping them
/// separate and avoids needing one store per domain.
pub fn build_circuit_max_candidates(
    graph: &TimingGraph,
    store: &TagStore,
    config: &EstaConfig,
    sta_critical_delay: f64,
) -> EstaResult<(TagStore, HashMap<DomainId, Vec<TagHandle>>)> {
    let mut max_store = TagStore::new(1);
    let slot = NodeId::from_raw(0);
    let mut candidates: HashMap<DomainId, Vec<TagHandle>> = HashMap::new();
    for idx in 0..graph.num_nodes() {
        let node = NodeId::from_raw(idx as u32);
        if !matches!(graph.node_kind(node)?, NodeKind::OutpadSink | NodeKind::FfSink) {
            continue;
        }
        for &handle in store.data_tags(node) {
            let tag = store.get(handle);
            if !tag.domain().is_valid() {
                continue;
            }
            let retagged = retag(tag, Transition::Max);
            let merged = max_store.insert(slot, TagKind::Data, retagged, &config.bin_policy, sta_critical_delay);
            let bucket = candidates.entry(tag.domain()).or_default();
            if !bucket.contains(&merged) {
                bucket.push(merged);
            }
        }
    }
    Ok((max_store, candidates))
}

fn retag(tag: &ExtTimingTag, transition: Transition) -> ExtTimingTag {
    let mut scenarios = tag.scenarios().iter();
    let first = scenarios.next().cloned().unwrap_or_default();
    let mut retagged = ExtTimingTag::new(tag.domain(), tag.launch_node(), transition, tag.arrival(), first);
    for conjunction in scenarios {
        retagged.merge_from(&ExtTimingTag::new(
            tag.domain(),
            tag.launch_node(),
            transition,
            tag.arrival(),
            conjunction.clone(),
        ));
    }
    retagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use esta_bdd::BddFunc;
    use esta_diagnostics::observer::NullObserver;
    use esta_graph::DelayTable;

    fn two_input_and_with_output_pad() -> (TimingGraph, DelayTable, NodeId) {
        let mut g = TimingGraph::new();
        let domain = DomainId::from_raw(0);
        let src_a = g.add_node(NodeKind::InpadSource, DomainId::INVALID, None);
        let opin_a = g.add_node(NodeKind::InpadOpin, DomainId::INVALID, None);
        let src_b = g.add_node(NodeKind::InpadSource, DomainId::INVALID, None);
        let opin_b = g.add_node(NodeKind::InpadOpin, DomainId::INVALID, None);
        let ipin_a = g.add_node(NodeKind::PrimitiveIpin, DomainId::INVALID, None);
        let ipin_b = g.add_node(NodeKind::PrimitiveIpin, DomainId::INVALID, None);
        let opin = g.add_node(NodeKind::PrimitiveOpin, DomainId::INVALID, None);
        let outpad_ipin = g.add_node(NodeKind::OutpadIpin, domain, None);
        let outpad_sink = g.add_node(NodeKind::OutpadSink, domain, None);

        g.add_edge(src_a, opin_a).unwrap();
        g.add_edge(src_b, opin_b).unwrap();
        let e_a = g.add_edge(opin_a, ipin_a).unwrap();
        let e_b = g.add_edge(opin_b, ipin_b).unwrap();
        let e_fa = g.add_edge(ipin_a, opin).unwrap();
        let e_fb = g.add_edge(ipin_b, opin).unwrap();
        g.add_edge(opin, outpad_ipin).unwrap();
        g.add_edge(outpad_ipin, outpad_sink).unwrap();

        let va = g.logic_mgr_mut().var(0);
        let vb = g.logic_mgr_mut().var(1);
        let func = g.logic_mgr_mut().and(va, vb);
        g.set_node_func(opin, func).unwrap();
        g.levelize().unwrap();

        let mut delays = DelayTable::new();
        for edge in [
            g.fanin(opin_a).unwrap()[0],
            g.fanin(opin_b).unwrap()[0],
            e_a,
            e_b,
            g.fanin(outpad_ipin).unwrap()[0],
            g.fanin(outpad_sink).unwrap()[0],
        ] {
            for &t in &Transition::EVENTS {
                delays.set_delay(edge, t, t, 0.0);
            }
        }
        for edge in [e_fa, e_fb] {
            for &it in &Transition::EVENTS {
                for &ot in &Transition::EVENTS {
                    delays.set_delay(edge, it, ot, 1.0);
                }
            }
        }
        (g, delays, outpad_sink)
    }

    #[test]
    fn and_gate_analysis_reaches_circuit_max_for_its_domain() {
        let (mut g, delays, _sink) = two_input_and_with_output_pad();
        let config = EstaConfig::default();
        let result = run_analysis(&mut g, &delays, &config, &NullObserver, 0.0).unwrap();
        let domain = DomainId::from_raw(0);
        let entries = result.circuit_max.get(&domain).expect("domain has candidates");
        let total: f64 = entries.iter().map(|e| e.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_gen_feeding_and_gate_keeps_probability_mass() {
        let mut g = TimingGraph::new();
        let domain = DomainId::from_raw(0);
        let const_src = g.add_node(NodeKind::ConstantGenSource, DomainId::INVALID, None);
        let const_net = g.add_node(NodeKind::PrimitiveIpin, DomainId::INVALID, None);
        let src_b = g.add_node(NodeKind::InpadSource, DomainId::INVALID, None);
        let opin_b = g.add_node(NodeKind::InpadOpin, DomainId::INVALID, None);
        let ipin_b = g.add_node(NodeKind::PrimitiveIpin, DomainId::INVALID, None);
        let opin = g.add_node(NodeKind::PrimitiveOpin, DomainId::INVALID, None);
        let outpad_ipin = g.add_node(NodeKind::OutpadIpin, domain, None);
        let outpad_sink = g.add_node(NodeKind::OutpadSink, domain, None);

        g.set_node_func(const_src, BddFunc::TRUE).unwrap();
        g.add_edge(const_src, const_net).unwrap();
        g.add_edge(src_b, opin_b).unwrap();
        let e_b = g.add_edge(opin_b, ipin_b).unwrap();
        let e_fa = g.add_edge(const_net, opin).unwrap();
        let e_fb = g.add_edge(ipin_b, opin).unwrap();
        g.add_edge(opin, outpad_ipin).unwrap();
        g.add_edge(outpad_ipin, outpad_sink).unwrap();

        let va = g.logic_mgr_mut().var(0);
        let vb = g.logic_mgr_mut().var(1);
        let func = g.logic_mgr_mut().and(va, vb);
        g.set_node_func(opin, func).unwrap();
        g.levelize().unwrap();

        let mut delays = DelayTable::new();
        for edge in [
            g.fanin(opin_b).unwrap()[0],
            e_b,
            g.fanin(outpad_ipin).unwrap()[0],
            g.fanin(outpad_sink).unwrap()[0],
        ] {
            for &t in &Transition::EVENTS {
                delays.set_delay(edge, t, t, 0.0);
            }
        }
        for &it in &Transition::EVENTS {
            for &ot in &Transition::EVENTS {
                delays.set_delay(e_fa, it, ot, 0.0);
                delays.set_delay(e_fb, it, ot, 1.0);
            }
        }
        let config = EstaConfig::default();
        let result = run_analysis(&mut g, &delays, &config, &NullObserver, 0.0).unwrap();
        let total: f64 = result
            .circuit_max
            .get(&domain)
            .unwrap()
            .iter()
            .map(|e| e.probability)
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
