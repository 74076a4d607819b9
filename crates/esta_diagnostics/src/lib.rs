//! Non-fatal observability for the ESTA engine: diagnostic events, severities,
//! and the [`Observer`] trait an embedder passes in to collect them.
//!
//! Every error kind the engine can raise (`MalformedGraph`, `UnmodeledDelay`, ...)
//! is fatal and surfaces through a `Result`, never through this crate. This
//! crate exists for the secondary channel described as a design goal of the
//! engine: process-wide counters and notices ("permutation budget nearly
//! exhausted", "xfunc cache evicted N entries", "STA-slack threshold computed
//! as ...") that are convenient to have but play no part in correctness.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod observer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use observer::{NullObserver, Observer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
