//! The observer seam between the engine and an embedder's telemetry.
//!
//! Process-wide counters and notices are convenient but are not part of the
//! engine's correctness contract, so they are collected through a
//! passed-in observer object rather than a global logger.

use crate::diagnostic::Diagnostic;

/// Receives non-fatal diagnostic events produced during an analysis run.
pub trait Observer: Send + Sync {
    /// Records a single diagnostic event.
    fn record(&self, diag: Diagnostic);
}

/// An [`Observer`] that discards every event. The default when an embedder
/// has no use for engine telemetry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn record(&self, _diag: Diagnostic) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    #[test]
    fn null_observer_is_a_no_op() {
        let observer = NullObserver;
        observer.record(Diagnostic::warning(
            DiagnosticCode::new(Category::Graph, 1),
            "ignored",
        ));
    }

    #[test]
    fn null_observer_usable_as_trait_object() {
        let observer: &dyn Observer = &NullObserver;
        observer.record(Diagnostic::note(
            DiagnosticCode::new(Category::Graph, 2),
            "also ignored",
        ));
    }
}
