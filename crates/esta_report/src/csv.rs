//! Hand-written CSV writers for the three output contracts: a per-node
//! delay/probability histogram, a per-node exhaustive input-to-output dump,
//! and the circuit-max equivalents of both. No `csv` crate dependency --
//! every row here is a handful of comma-joined numbers, not data that needs
//! quoting or escaping.

use std::io::{self, Write};

use crate::exhaustive::ExhaustiveRow;
use crate::histogram::Histogram;

/// Writes a node's delay histogram as `delay,probability` rows.
pub fn write_histogram_csv<W: Write>(w: &mut W, rows: &Histogram) -> io::Result<()> {
    writeln!(w, "delay,probability")?;
    for (delay, probability) in rows {
        writeln!(w, "{delay},{probability}")?;
    }
    Ok(())
}

/// Writes a circuit-max delay histogram as `delay:MAX,probability` rows.
pub fn write_circuit_max_histogram_csv<W: Write>(w: &mut W, rows: &Histogram) -> io::Result<()> {
    writeln!(w, "delay:MAX,probability")?;
    for (delay, probability) in rows {
        writeln!(w, "{delay},{probability}")?;
    }
    Ok(())
}

/// Writes an exhaustive input-to-output dump: one header column per named
/// primary input, then `<node_label>,delay`.
pub fn write_exhaustive_csv<W: Write>(
    w: &mut W,
    input_names: &[String],
    node_label: &str,
    rows: &[ExhaustiveRow],
) -> io::Result<()> {
    for name in input_names {
        write!(w, "{name},")?;
    }
    writeln!(w, "{node_label},delay")?;
    for row in rows {
        for t in &row.inputs {
            write!(w, "{t},")?;
        }
        writeln!(w, "{},{}", row.output, row.delay)?;
    }
    Ok(())
}

/// Writes the circuit-max exhaustive dump: the same shape as
/// [`write_exhaustive_csv`] with the output column labeled `MAX`.
pub fn write_max_exhaustive_csv<W: Write>(
    w: &mut W,
    input_names: &[String],
    rows: &[ExhaustiveRow],
) -> io::Result<()> {
    write_exhaustive_csv(w, input_names, "MAX", rows)
}
