//! The #SAT / BDD engine (component C5): a self-contained ROBDD manager, the
//! primary-input transition variable allocation schemes, and a bounded
//! `xfunc` memoization cache.
//!
//! See `DESIGN.md` for why this manager is first-party rather than a
//! wrapped external BDD package.

#![warn(missing_docs)]

pub mod cache;
pub mod encoding;
pub mod manager;

pub use cache::XfuncCache;
pub use encoding::InputEncoding;
pub use manager::{BddFunc, BddManager, Var};
