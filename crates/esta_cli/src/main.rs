//! ESTA CLI — a thin binary tying the builder, propagation engine, and
//! report crates together end to end.
//!
//! `esta build` runs a full analysis over a netlist and prints a per-domain
//! circuit-max summary. `esta report` dumps one node's delay histogram or
//! exhaustive input-to-output table as CSV. Neither subcommand parses a
//! real netlist format (BLIF, SDF back-annotation); both load the minimal
//! text format `esta_builder::NetlistBuilder` understands, since a real
//! front end is out of scope.

#![warn(missing_docs)]

mod build;
mod pipeline;
mod report;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// ESTA — an extended static timing analysis engine.
#[derive(Parser, Debug)]
#[command(name = "esta", version, about = "Extended Static Timing Analysis")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose diagnostic output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to an `esta.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full analysis over a netlist and summarize circuit-max results.
    Build(BuildArgs),
    /// Dump one node's histogram or exhaustive table as CSV.
    Report(ReportArgs),
}

/// Arguments for the `esta build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Path to a text netlist file (see `esta_builder::NetlistBuilder`).
    pub netlist: String,

    /// Directory to write per-domain circuit-max CSV files into.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// The precomputed classical-STA critical-path delay, consulted only by
    /// the `sta_slack` delay-bin policy.
    #[arg(long, default_value_t = 0.0)]
    pub sta_critical_delay: f64,
}

/// Arguments for the `esta report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Path to a text netlist file.
    pub netlist: String,

    /// The declared signal name to report on (an `input`, `gate`, `ff`, or
    /// `const` name — not an `output` pad label).
    pub node: String,

    /// Which table to dump.
    #[arg(short = 'k', long, value_enum, default_value_t = ReportKind::Histogram)]
    pub kind: ReportKind,

    /// Names for the exhaustive dump's input columns, in primary-input
    /// declaration order. Missing names fall back to `in0`, `in1`, ...
    #[arg(long, num_args = 0.., value_delimiter = ',')]
    pub inputs: Vec<String>,

    /// Write the CSV to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Which report table to dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// A delay/probability histogram.
    Histogram,
    /// An exhaustive input-transition-to-output table.
    Exhaustive,
}

/// Global settings derived from CLI flags, threaded through to subcommands.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose diagnostic output.
    pub verbose: bool,
    /// Optional path to a configuration file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Report(ref args) => report::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
