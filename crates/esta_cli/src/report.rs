//! `esta report` — dumps one node's delay histogram or exhaustive
//! input-to-output table as CSV, to a file or stdout.

use std::fs;
use std::path::Path;

use esta_bdd::{BddManager, InputEncoding, XfuncCache};
use esta_diagnostics::DiagnosticSink;
use esta_graph::{NodeId, NodeKind};

use crate::pipeline;
use crate::{GlobalArgs, ReportArgs, ReportKind};

/// Runs the `esta report` command.
pub fn run(args: &ReportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let text = pipeline::load_netlist_source(Path::new(&args.netlist))?;
    let config = pipeline::load_config(global)?;
    let nb = pipeline::parse_netlist(&text)?;
    let node = nb.node_for(&args.node)?;
    let (mut graph, delays, _resolver) = nb.finish()?;

    let sink = DiagnosticSink::new();
    let result = esta_engine::run_analysis(&mut graph, &delays, &config, &sink, 0.0)?;

    let pi_index = esta_engine::build_pi_index(&graph)?;
    let constant_sources: std::collections::HashSet<NodeId> = (0..graph.num_nodes())
        .map(|idx| NodeId::from_raw(idx as u32))
        .filter(|&n| graph.node_kind(n).unwrap() == NodeKind::ConstantGenSource)
        .collect();
    let num_inputs = pi_index.len() as u32;
    let encoding = InputEncoding::from(config.cond_func);
    let pi_index_fn = move |n: NodeId| *pi_index.get(&n).expect("every launch node has a PI slot");
    let is_constant_fn = move |n: NodeId| constant_sources.contains(&n);
    let cond = move |mgr: &mut BddManager, n: NodeId, t: esta_common::Transition| {
        esta_engine::xfunc::seed_cond_func(mgr, encoding, &is_constant_fn, &pi_index_fn, n, t)
    };

    let mut mgr = BddManager::new();
    let mut cache = XfuncCache::new(config.xfunc_cache_capacity);

    let mut out: Box<dyn std::io::Write> = match &args.output {
        Some(path) => Box::new(fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    };

    match args.kind {
        ReportKind::Histogram => {
            let tags = result.store.data_tags(node);
            let histogram = esta_report::node_histogram(&mut mgr, &result.store, &mut cache, &cond, tags);
            esta_report::write_histogram_csv(&mut out, &histogram)?;
        }
        ReportKind::Exhaustive => {
            let input_names = input_names(&args.inputs, num_inputs);
            let tags = result.store.data_tags(node);
            let rows = esta_report::exhaustive_rows(
                &mut mgr,
                &result.store,
                &mut cache,
                &cond,
                encoding,
                num_inputs,
                tags,
            );
            esta_report::write_exhaustive_csv(&mut out, &input_names, &args.node, &rows)?;
        }
    }

    Ok(0)
}

/// Names the `num_inputs` exhaustive-dump columns from `--inputs`, falling
/// back to `in0, in1, ...` for any name the flag didn't supply.
fn input_names(supplied: &[String], num_inputs: u32) -> Vec<String> {
    (0..num_inputs)
        .map(|i| {
            supplied
                .get(i as usize)
                .cloned()
                .unwrap_or_else(|| format!("in{i}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_netlist(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn input_names_fills_in_missing_names() {
        let names = input_names(&["a".to_string()], 3);
        assert_eq!(names, vec!["a", "in1", "in2"]);
    }

    #[test]
    fn report_histogram_writes_csv_header() {
        let file = write_netlist("input a\noutput z a\n");
        let out_file = tempfile::NamedTempFile::new().unwrap();
        let args = ReportArgs {
            netlist: file.path().to_string_lossy().to_string(),
            node: "a".to_string(),
            kind: ReportKind::Histogram,
            inputs: vec![],
            output: Some(out_file.path().to_string_lossy().to_string()),
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        };
        let code = run(&args, &global).unwrap();
        assert_eq!(code, 0);
        let content = fs::read_to_string(out_file.path()).unwrap();
        assert!(content.starts_with("delay,probability"));
    }

    #[test]
    fn report_exhaustive_names_its_own_node_as_output_column() {
        let file = write_netlist("input a\ngate y not a delay 1.0\noutput z y\n");
        let out_file = tempfile::NamedTempFile::new().unwrap();
        let args = ReportArgs {
            netlist: file.path().to_string_lossy().to_string(),
            node: "y".to_string(),
            kind: ReportKind::Exhaustive,
            inputs: vec!["a".to_string()],
            output: Some(out_file.path().to_string_lossy().to_string()),
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        };
        run(&args, &global).unwrap();
        let content = fs::read_to_string(out_file.path()).unwrap();
        assert!(content.starts_with("a,y,delay"));
    }
}
