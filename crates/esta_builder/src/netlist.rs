//! A minimal in-memory text netlist format, used only by tests and demos to
//! exercise the engine end to end without a real BLIF/SDF parser (explicitly
//! out of scope; see spec §1).
//!
//! One statement per line, `#` starts a trailing comment, blank lines are
//! ignored:
//!
//! ```text
//! input a
//! input b
//! const c0 0
//! clock clk
//! gate y and a b delay 1.0
//! gate w not y delay 0.5
//! ff q d w clk clk delay 0.2
//! output z y
//! ```
//!
//! `gate <name> <op> <args...> delay <d>` builds a combinational primitive
//! (`op` one of `and`, `or`, `xor`, `not`) over one `PrimitiveIpin` per arg
//! and a `PrimitiveOpin` named `<name>`. `ff <name> d <arg> clk <clk> delay
//! <d>` builds a flip-flop whose `Q` is named `<name>`, launched on the
//! domain `clk` declared, with `<d>` as its clock-to-`Q` delay (the launch
//! edge itself is always zero delay: spec §4.2 resolves any `Clock`-involved
//! lookup to `0.0` regardless of what is recorded).

use std::collections::HashMap;

use esta_common::{EstaError, EstaResult};
use esta_graph::{DelayTable, DomainId, NodeId, NodeKind, TimingGraph};

use crate::builder::GraphBuilder;
use crate::resolver::InternedResolver;

/// Builds a [`TimingGraph`] from the text format described in the module
/// docs, driving a [`GraphBuilder`] one statement at a time.
#[derive(Default)]
pub struct NetlistBuilder {
    builder: GraphBuilder,
    drivers: HashMap<String, NodeId>,
    clocks: HashMap<String, (NodeId, DomainId)>,
    next_domain: u32,
}

impl NetlistBuilder {
    /// Creates an empty netlist builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every line of `text`, applying each statement to the
    /// underlying [`GraphBuilder`].
    pub fn parse(&mut self, text: &str) -> EstaResult<()> {
        for raw_line in text.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            self.parse_line(line)?;
        }
        Ok(())
    }

    fn parse_line(&mut self, line: &str) -> EstaResult<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let directive = *tokens.first().ok_or_else(|| malformed(line, "empty statement"))?;
        match directive {
            "input" => {
                let name = token(&tokens, 1, line)?;
                self.declare_input(name)
            }
            "const" => {
                let name = token(&tokens, 1, line)?;
                let value = token(&tokens, 2, line)? == "1";
                self.declare_const(name, value)
            }
            "clock" => {
                let name = token(&tokens, 1, line)?;
                self.declare_clock(name)
            }
            "gate" => {
                let name = token(&tokens, 1, line)?;
                let op = token(&tokens, 2, line)?;
                let delay_idx = tokens
                    .iter()
                    .position(|&t| t == "delay")
                    .ok_or_else(|| malformed(line, "gate statement missing `delay`"))?;
                let args = &tokens[3..delay_idx];
                let delay = parse_delay(&tokens, delay_idx, line)?;
                self.declare_gate(name, op, args, delay)
            }
            "ff" => {
                let name = token(&tokens, 1, line)?;
                if token(&tokens, 2, line)? != "d" {
                    return Err(malformed(line, "ff statement expected `d` keyword"));
                }
                let d_arg = token(&tokens, 3, line)?;
                if token(&tokens, 4, line)? != "clk" {
                    return Err(malformed(line, "ff statement expected `clk` keyword"));
                }
                let clk_arg = token(&tokens, 5, line)?;
                let delay_idx = tokens
                    .iter()
                    .position(|&t| t == "delay")
                    .ok_or_else(|| malformed(line, "ff statement missing `delay`"))?;
                let delay = parse_delay(&tokens, delay_idx, line)?;
                self.declare_ff(name, d_arg, clk_arg, delay)
            }
            "output" => {
                let name = token(&tokens, 1, line)?;
                let arg = token(&tokens, 2, line)?;
                self.declare_output(name, arg)
            }
            other => Err(malformed(line, &format!("unknown directive `{other}`"))),
        }
    }

    fn driver(&self, name: &str) -> EstaResult<NodeId> {
        self.drivers.get(name).copied().ok_or_else(|| EstaError::UnresolvedInstance {
            detail: format!("reference to undeclared signal `{name}`"),
        })
    }

    fn declare_input(&mut self, name: &str) -> EstaResult<()> {
        let source = self.builder.add_node(NodeKind::InpadSource, DomainId::INVALID, None);
        let opin = self.builder.add_node(NodeKind::InpadOpin, DomainId::INVALID, Some(name));
        let edge = self.builder.add_edge(source, opin)?;
        self.builder.set_passthrough_delay(edge, 0.0);
        self.drivers.insert(name.to_string(), opin);
        Ok(())
    }

    fn declare_const(&mut self, name: &str, value: bool) -> EstaResult<()> {
        let node = self.builder.add_node(NodeKind::ConstantGenSource, DomainId::INVALID, Some(name));
        let func = if value {
            self.builder.logic_mgr_mut().one()
        } else {
            self.builder.logic_mgr_mut().zero()
        };
        self.builder.set_node_func(node, func)?;
        self.drivers.insert(name.to_string(), node);
        Ok(())
    }

    fn declare_clock(&mut self, name: &str) -> EstaResult<()> {
        let domain = DomainId::from_raw(self.next_domain);
        self.next_domain += 1;
        let source = self.builder.add_node(NodeKind::ClockSource, domain, None);
        let opin = self.builder.add_node(NodeKind::ClockOpin, domain, Some(name));
        self.builder.add_edge(source, opin)?;
        self.clocks.insert(name.to_string(), (opin, domain));
        Ok(())
    }

    fn declare_gate(&mut self, name: &str, op: &str, args: &[&str], delay: f64) -> EstaResult<()> {
        if op == "not" && args.len() != 1 {
            return Err(malformed(name, "`not` takes exactly one argument"));
        }
        if op != "not" && args.len() < 2 {
            return Err(malformed(name, "gate needs at least two arguments"));
        }
        let mut ipins = Vec::with_capacity(args.len());
        let mut vars = Vec::with_capacity(args.len());
        for (i, &arg) in args.iter().enumerate() {
            let driver = self.driver(arg)?;
            let ipin = self.builder.add_node(NodeKind::PrimitiveIpin, DomainId::INVALID, None);
            let net_edge = self.builder.add_edge(driver, ipin)?;
            self.builder.set_passthrough_delay(net_edge, 0.0);
            vars.push(self.builder.fanin_var(i as u32));
            ipins.push(ipin);
        }
        let func = combine(self.builder.logic_mgr_mut(), op, &vars)
            .ok_or_else(|| malformed(name, &format!("unknown gate operator `{op}`")))?;
        let opin = self.builder.add_node(NodeKind::PrimitiveOpin, DomainId::INVALID, Some(name));
        for ipin in ipins {
            let internal_edge = self.builder.add_edge(ipin, opin)?;
            self.builder.set_uniform_delay(internal_edge, delay);
        }
        self.builder.set_node_func(opin, func)?;
        self.drivers.insert(name.to_string(), opin);
        Ok(())
    }

    fn declare_ff(&mut self, name: &str, d_arg: &str, clk_arg: &str, delay: f64) -> EstaResult<()> {
        let (clk_driver, domain) =
            *self.clocks.get(clk_arg).ok_or_else(|| EstaError::UnresolvedInstance {
                detail: format!("reference to undeclared clock `{clk_arg}`"),
            })?;
        let ff_clock = self.builder.add_node(NodeKind::FfClock, domain, None);
        self.builder.add_edge(clk_driver, ff_clock)?;

        let ff_source = self.builder.add_node(NodeKind::FfSource, domain, None);
        self.builder.add_edge(ff_clock, ff_source)?;

        let ff_opin = self.builder.add_node(NodeKind::FfOpin, domain, Some(name));
        let q_edge = self.builder.add_edge(ff_source, ff_opin)?;
        self.builder.set_passthrough_delay(q_edge, delay);

        let d_driver = self.driver(d_arg)?;
        let ff_ipin = self.builder.add_node(NodeKind::FfIpin, domain, None);
        let d_edge = self.builder.add_edge(d_driver, ff_ipin)?;
        self.builder.set_passthrough_delay(d_edge, 0.0);

        let ff_sink = self.builder.add_node(NodeKind::FfSink, domain, None);
        let sink_edge = self.builder.add_edge(ff_ipin, ff_sink)?;
        self.builder.set_passthrough_delay(sink_edge, 0.0);
        self.builder.add_edge(ff_clock, ff_sink)?;

        self.drivers.insert(name.to_string(), ff_opin);
        Ok(())
    }

    fn declare_output(&mut self, name: &str, arg: &str) -> EstaResult<()> {
        let driver = self.driver(arg)?;
        let ipin = self.builder.add_node(NodeKind::OutpadIpin, DomainId::INVALID, Some(name));
        let in_edge = self.builder.add_edge(driver, ipin)?;
        self.builder.set_passthrough_delay(in_edge, 0.0);
        let sink = self.builder.add_node(NodeKind::OutpadSink, DomainId::INVALID, None);
        let sink_edge = self.builder.add_edge(ipin, sink)?;
        self.builder.set_passthrough_delay(sink_edge, 0.0);
        Ok(())
    }

    /// Looks up the driving node currently registered for `name`, for
    /// callers that want a handle into the graph before `finish` (e.g. to
    /// locate the output node a test should inspect).
    pub fn node_for(&self, name: &str) -> EstaResult<NodeId> {
        self.driver(name)
    }

    /// Levelizes the accumulated graph and returns it with its delay table
    /// and name resolver.
    pub fn finish(self) -> EstaResult<(TimingGraph, DelayTable, InternedResolver)> {
        self.builder.finish()
    }
}

fn token<'a>(tokens: &[&'a str], idx: usize, line: &str) -> EstaResult<&'a str> {
    tokens.get(idx).copied().ok_or_else(|| malformed(line, "statement has too few tokens"))
}

fn parse_delay(tokens: &[&str], delay_idx: usize, line: &str) -> EstaResult<f64> {
    token(tokens, delay_idx + 1, line)?
        .parse()
        .map_err(|_| malformed(line, "delay value is not a number"))
}

fn combine(mgr: &mut esta_bdd::BddManager, op: &str, vars: &[esta_bdd::BddFunc]) -> Option<esta_bdd::BddFunc> {
    let mut iter = vars.iter().copied();
    let first = iter.next()?;
    match op {
        "not" => Some(mgr.not(first)),
        "and" => Some(iter.fold(first, |acc, v| mgr.and(acc, v))),
        "or" => Some(iter.fold(first, |acc, v| mgr.or(acc, v))),
        "xor" => Some(iter.fold(first, |acc, v| xor(mgr, acc, v))),
        _ => None,
    }
}

fn xor(mgr: &mut esta_bdd::BddManager, a: esta_bdd::BddFunc, b: esta_bdd::BddFunc) -> esta_bdd::BddFunc {
    let not_a = mgr.not(a);
    let not_b = mgr.not(b);
    let a_and_not_b = mgr.and(a, not_b);
    let not_a_and_b = mgr.and(not_a, b);
    mgr.or(a_and_not_b, not_a_and_b)
}

fn malformed(context: &str, detail: &str) -> EstaError {
    EstaError::MalformedGraph {
        detail: format!("{detail} (in `{context}`)"),
        node: None,
        edge: None,
    }
}
