//! The three CSV output contracts an `esta_engine` analysis result is
//! rendered through: a per-node delay histogram, a per-node exhaustive
//! input-transition-to-output dump, and the circuit-max equivalents of
//! both. Pure data shaping and hand-written CSV writing -- no file I/O or
//! argument parsing lives here; that's `esta_cli`'s job.

#![warn(missing_docs)]

mod csv;
mod exhaustive;
mod histogram;

pub use csv::{
    write_circuit_max_histogram_csv, write_exhaustive_csv, write_histogram_csv,
    write_max_exhaustive_csv,
};
pub use exhaustive::{exhaustive_rows, ExhaustiveRow};
pub use histogram::{circuit_max_histogram, node_histogram, Histogram};
