//! The extended timing tag store (component C3): tags, scenarios, delay
//! binning, and the per-node match/merge tag sets the propagation engine
//! reads and writes during its forward sweep.

#![warn(missing_docs)]

pub mod binning;
pub mod store;
pub mod tag;

pub use binning::{bin_arrival, Bin};
pub use store::{TagKind, TagStore};
pub use tag::{Conjunction, ExtTimingTag, Scenario, TagHandle};
