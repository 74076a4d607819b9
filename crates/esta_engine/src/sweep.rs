//! The level-ordered forward sweep: seeds source nodes, then visits every
//! other node in level order, evaluating its output transition(s) over
//! every permutation of its fanin tags and merging the resulting arrivals
//! into the tag store.

use esta_common::{EstaError, EstaResult, Transition};
use esta_config::types::EstaConfig;
use esta_diagnostics::{Category, Diagnostic, DiagnosticCode, Observer};
use esta_graph::{DomainId, EdgeKind, NodeId, NodeKind, TimingGraph};
use esta_tags::{ExtTimingTag, TagHandle, TagKind, TagStore};

use crate::eval::evaluate_output_transition;
use crate::permutation::generate_permutations;

fn tag_kind_for(kind: NodeKind) -> TagKind {
    match kind {
        NodeKind::ClockSource | NodeKind::ClockOpin | NodeKind::FfClock => TagKind::Clock,
        _ => TagKind::Data,
    }
}

/// Seeds every source node (`InpadSource`, `FfSource`'s clock fanin is
/// handled during the sweep proper, `ClockSource`, `ConstantGenSource`)
/// with its base tags before the forward sweep begins.
pub fn seed_sources(
    graph: &TimingGraph,
    store: &mut TagStore,
    config: &EstaConfig,
    sta_critical_delay: f64,
) -> EstaResult<()> {
    for idx in 0..graph.num_nodes() {
        let node = NodeId::from_raw(idx as u32);
        let kind = graph.node_kind(node)?;
        match kind {
            NodeKind::InpadSource => {
                let domain = graph.node_domain(node)?;
                for &t in &Transition::EVENTS {
                    let tag = ExtTimingTag::seed(domain, node, t, 0.0);
                    store.insert(node, TagKind::Data, tag, &config.bin_policy, sta_critical_delay);
                }
            }
            NodeKind::ClockSource => {
                let domain = graph.node_domain(node)?;
                let tag = ExtTimingTag::seed(domain, node, Transition::Clock, 0.0);
                store.insert(node, TagKind::Clock, tag, &config.bin_policy, sta_critical_delay);
            }
            NodeKind::ConstantGenSource => {
                let domain = graph.node_domain(node)?;
                let func = graph.node_func(node)?.ok_or_else(|| EstaError::MalformedGraph {
                    detail: "constant generator source has no assigned function".to_string(),
                    node: Some(node.as_raw()),
                    edge: None,
                })?;
                let transition = if func == esta_bdd::BddFunc::TRUE {
                    Transition::High
                } else if func == esta_bdd::BddFunc::FALSE {
                    Transition::Low
                } else {
                    return Err(EstaError::MalformedGraph {
                        detail: "constant generator source function is not a constant 0/1"
                            .to_string(),
                        node: Some(node.as_raw()),
                        edge: None,
                    });
                };
                let tag = ExtTimingTag::seed(domain, node, transition, 0.0);
                store.insert(node, TagKind::Data, tag, &config.bin_policy, sta_critical_delay);
            }
            _ => {}
        }
    }
    Ok(())
}

/// Runs the level-ordered forward sweep over every node strictly above
/// level 0 (level 0 holds the seeded source nodes).
///
/// `graph` is taken mutably because transition evaluation restricts node
/// functions in the graph's own logic BDD manager, populating its caches.
pub fn run_forward_sweep(
    graph: &mut TimingGraph,
    delays: &esta_graph::DelayTable,
    config: &EstaConfig,
    observer: &dyn Observer,
    sta_critical_delay: f64,
) -> EstaResult<TagStore> {
    if !graph.is_levelized() {
        return Err(EstaError::internal(
            "forward sweep requires a levelized graph",
        ));
    }
    let mut store = TagStore::new(graph.num_nodes());
    seed_sources(graph, &mut store, config, sta_critical_delay)?;

    for level in 1..=graph.max_level() {
        for node in graph.nodes_at_level(level) {
            propagate_node(graph, delays, &mut store, config, node, observer, sta_critical_delay)?;
        }
    }
    Ok(store)
}

fn propagate_node(
    graph: &mut TimingGraph,
    delays: &esta_graph::DelayTable,
    store: &mut TagStore,
    config: &EstaConfig,
    node: NodeId,
    observer: &dyn Observer,
    sta_critical_delay: f64,
) -> EstaResult<()> {
    let kind = graph.node_kind(node)?;
    match kind {
        NodeKind::FfSource => propagate_ff_source(graph, delays, store, config, node, sta_critical_delay),
        NodeKind::PrimitiveOpin => {
            propagate_function_node(graph, delays, store, config, node, observer, sta_critical_delay)
        }
        _ => propagate_passthrough(graph, delays, store, config, node, sta_critical_delay),
    }
}

/// Relays the single (non-hold-check) fanin's tags unchanged except for
/// accumulated delay: covers nets, pad/clock-network bookkeeping arcs, and
/// the flip-flop `D`/`Q` internal arcs that carry no logic of their own.
fn propagate_passthrough(
    graph: &TimingGraph,
    delays: &esta_graph::DelayTable,
    store: &mut TagStore,
    config: &EstaConfig,
    node: NodeId,
    sta_critical_delay: f64,
) -> EstaResult<()> {
    let out_kind = tag_kind_for(graph.node_kind(node)?);
    for &edge in graph.fanin(node)? {
        if graph.edge_kind(edge) == EdgeKind::FfClockToSinkInternal {
            // A hold-time reference, not a forward propagation path.
            continue;
        }
        let (from, _) = graph.edge_endpoints(edge);
        let src_kind = tag_kind_for(graph.node_kind(from)?);
        let handles: Vec<TagHandle> = store.tags_of_kind(from, src_kind).to_vec();
        for handle in handles {
            let tag = store.get(handle).clone();
            let delay = delays.edge_delay(edge, tag.transition(), tag.transition())?;
            let new_tag = ExtTimingTag::new(
                tag.domain(),
                tag.launch_node(),
                tag.transition(),
                tag.arrival() + delay,
                vec![handle],
            );
            store.insert(node, out_kind, new_tag, &config.bin_policy, sta_critical_delay);
        }
    }
    Ok(())
}

/// A flip-flop's launch source is the sequential boundary: its `Q`
/// transition is not a function of its immediate fanin (that fanin is only
/// the clock), so every one of the four events is treated as an
/// independent, equally first-class possibility per captured clock edge —
/// the same break classical STA makes at a register boundary.
///
/// Each event is seeded fresh at `node` (empty scenario) rather than
/// conjoined onto the triggering clock tag's scenario: the clock chain
/// itself carries no switching probability of its own (every clock tag's
/// `xfunc` is the tautology), so chaining would make every event inherit
/// the same always-true witness instead of the four-way split this
/// docstring describes. `node` is given its own primary-input-like slot in
/// the engine's variable allocation for exactly this reason.
fn propagate_ff_source(
    graph: &TimingGraph,
    delays: &esta_graph::DelayTable,
    store: &mut TagStore,
    config: &EstaConfig,
    node: NodeId,
    sta_critical_delay: f64,
) -> EstaResult<()> {
    for &edge in graph.fanin(node)? {
        let (from, _) = graph.edge_endpoints(edge);
        let clock_handles: Vec<TagHandle> = store.tags_of_kind(from, TagKind::Clock).to_vec();
        for handle in clock_handles {
            let clock_tag = store.get(handle).clone();
            for &event in &Transition::EVENTS {
                let delay = delays.edge_delay(edge, clock_tag.transition(), event)?;
                let new_tag =
                    ExtTimingTag::seed(clock_tag.domain(), node, event, clock_tag.arrival() + delay);
                store.insert(node, TagKind::Data, new_tag, &config.bin_policy, sta_critical_delay);
            }
        }
    }
    Ok(())
}

/// Evaluates a combinational primitive's output over every permutation of
/// its fanin tags.
fn propagate_function_node(
    graph: &mut TimingGraph,
    delays: &esta_graph::DelayTable,
    store: &mut TagStore,
    config: &EstaConfig,
    node: NodeId,
    observer: &dyn Observer,
    sta_critical_delay: f64,
) -> EstaResult<()> {
    let func = graph.node_func(node)?.ok_or_else(|| EstaError::MalformedGraph {
        detail: "primitive output pin has no assigned function".to_string(),
        node: Some(node.as_raw()),
        edge: None,
    })?;
    let fanin: Vec<_> = graph.fanin(node)?.to_vec();
    let per_fanin_tags: Vec<Vec<TagHandle>> = fanin
        .iter()
        .map(|&edge| {
            let (from, _) = graph.edge_endpoints(edge);
            store.tags_of_kind(from, TagKind::Data).to_vec()
        })
        .collect();

    let combos = generate_permutations(node, &per_fanin_tags, config.max_permutations)?;
    if config.max_permutations != 0
        && combos.len() as u64 * 2 > config.max_permutations
        && !combos.is_empty()
    {
        observer.record(
            Diagnostic::warning(
                DiagnosticCode::new(Category::Propagation, 201),
                format!(
                    "node {} permutation count {} is over half its budget {}",
                    node.as_raw(),
                    combos.len(),
                    config.max_permutations
                ),
            )
            .with_note("consider a coarser bin policy or a smaller max_permutations margin"),
        );
    }

    for combo in combos {
        let input_transitions: Vec<Transition> =
            combo.iter().map(|&h| store.get(h).transition()).collect();
        let output_transition =
            evaluate_output_transition(graph.logic_mgr_mut(), func, &input_transitions);

        let mut best_arrival = f64::NEG_INFINITY;
        let mut best_domain = DomainId::INVALID;
        let mut best_launch = node;
        for (i, &handle) in combo.iter().enumerate() {
            let tag = store.get(handle);
            let delay = delays.edge_delay(fanin[i], tag.transition(), output_transition)?;
            let arrival = tag.arrival() + delay;
            if arrival > best_arrival {
                best_arrival = arrival;
                best_domain = tag.domain();
                best_launch = tag.launch_node();
            }
        }
        if combo.is_empty() {
            best_arrival = 0.0;
        }

        // The next-state filter drops logically redundant input tags from
        // the recorded conjunction (not from the arrival computation above,
        // which always considers every incoming edge per spec §4.4.2 step
        // 3b): two permutations differing only in a filtered position's
        // transition then cite the same witness and can merge.
        let conjunction = if config.enable_transition_filter && combo.len() > 1 {
            let arrivals: Vec<f64> = combo.iter().map(|&h| store.get(h).arrival()).collect();
            let filtered = crate::filter::filtered_positions(
                graph.logic_mgr_mut(),
                func,
                &arrivals,
                &input_transitions,
            );
            combo
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !filtered.contains(i))
                .map(|(_, h)| h)
                .collect()
        } else {
            combo
        };

        let new_tag =
            ExtTimingTag::new(best_domain, best_launch, output_transition, best_arrival, conjunction);
        store.insert(node, TagKind::Data, new_tag, &config.bin_policy, sta_critical_delay);
    }
    Ok(())
}
