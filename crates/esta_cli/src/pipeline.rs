//! Shared steps used by both subcommands: load a netlist source file, load
//! an `esta.toml` configuration, and parse the netlist into a graph.
//!
//! `esta_cli` has no BLIF/back-annotation front end of its own (out of
//! scope; see `esta_builder`'s module docs), so "loading a netlist" here
//! always means the minimal text format `esta_builder::NetlistBuilder`
//! understands.

use std::fs;
use std::path::Path;

use esta_builder::NetlistBuilder;
use esta_config::EstaConfig;

use crate::GlobalArgs;

/// Reads the netlist source file at `path`.
pub fn load_netlist_source(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
}

/// Loads the run configuration: `global.config` if given, otherwise the
/// engine's defaults. Unlike `esta_config::load_config`, `--config` names a
/// file directly rather than a project directory, since `esta_cli` has no
/// notion of a project root.
pub fn load_config(global: &GlobalArgs) -> Result<EstaConfig, Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(esta_config::load_config_from_str(&content)?)
        }
        None => Ok(EstaConfig::default()),
    }
}

/// Parses `text` into a [`NetlistBuilder`], ready for [`NetlistBuilder::node_for`]
/// lookups before [`NetlistBuilder::finish`] consumes it.
pub fn parse_netlist(text: &str) -> esta_common::EstaResult<NetlistBuilder> {
    let mut builder = NetlistBuilder::new();
    builder.parse(text)?;
    Ok(builder)
}
