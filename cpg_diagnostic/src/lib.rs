//! Diagnostic collection for the CPG core.
//!
//! The core never raises exceptions past the project driver (`spec.md` §7):
//! every soft failure — missing scope on leave, unresolved reference,
//! function-pointer ambiguity above the cap, a type that failed to parse —
//! becomes a [`Diagnostic`] pushed onto a [`DiagnosticBag`] plus (where the
//! graph needs to reflect it) a node left in its documented fallback state
//! (`refersTo = None`, `UnknownType`, an unbound call). Diagnostics are data
//! a caller can inspect after a run; nothing here panics on malformed input.
//!
//! Every diagnostic is also emitted as a `tracing` event at a matching
//! level, so a caller who only wants logs (and doesn't care to inspect the
//! bag) gets the same information for free by wiring a subscriber — the
//! core never initializes one itself.

use cpg_ir::Location;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<Location>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, location: Option<Location>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    pub fn warning(message: impl Into<String>, location: Option<Location>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            location,
        }
    }
}

/// Collects diagnostics for a single run. One bag per project driver
/// invocation, threaded by `&mut` through the frontend and resolver the way
/// `ScopeManager` and `TypeRegistry` are.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::error!(message = %diagnostic.message, "diagnostic"),
            Severity::Warning => tracing::warn!(message = %diagnostic.message, "diagnostic"),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, message: impl Into<String>, location: Option<Location>) {
        self.push(Diagnostic::error(message, location));
    }

    pub fn warning(&mut self, message: impl Into<String>, location: Option<Location>) {
        self.push(Diagnostic::warning(message, location));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_tracks_errors_separately_from_warnings() {
        let mut bag = DiagnosticBag::new();
        bag.warning("unresolved reference to foo", None);
        assert!(!bag.has_errors());
        bag.error("parse failure in file.go", None);
        assert!(bag.has_errors());
        assert_eq!(bag.len(), 2);
    }
}
