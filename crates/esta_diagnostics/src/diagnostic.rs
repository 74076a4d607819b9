//! Structured diagnostic events with severity, codes, and an optional node.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use esta_common::Ident;
use serde::{Deserialize, Serialize};

/// A structured, non-fatal event reported by the engine to an [`Observer`](crate::Observer).
///
/// Diagnostics here are never the mechanism by which the engine reports a
/// failed analysis run — that is always a `Result`. They record things worth
/// knowing about a *successful* run: a near-budget permutation count, a cache
/// eviction, a chosen delay-bin threshold.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique event code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The node this diagnostic concerns, if any (resolved to a name only by
    /// the embedder's name-resolver; the engine never reads the string).
    pub node: Option<Ident>,
    /// Explanatory footnotes (e.g., "note: ...").
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error-severity diagnostic with the given code and message.
    ///
    /// Reserved for events worth flagging loudly that nonetheless do not abort
    /// the run (unlike the engine's fatal `esta_common::EstaError` kinds).
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            node: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning-severity diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            node: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new note-severity diagnostic with the given code and message.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            code,
            message: message.into(),
            node: None,
            notes: Vec::new(),
        }
    }

    /// Attaches the node this diagnostic concerns.
    pub fn with_node(mut self, node: Ident) -> Self {
        self.node = Some(node);
        self
    }

    /// Adds an explanatory note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}
