//! Shared result type for post-processing passes.
//!
//! Passes mutate the registry in place, so a `PassResult` only carries the
//! bookkeeping: the changes applied and any diagnostics raised.

use crate::report::{Change, Diagnostic, Report};

/// Unified result of a single post-processing pass.
#[derive(Debug, Default)]
pub struct PassResult {
    /// Mutations applied by this pass.
    pub changes: Vec<Change>,
    /// Findings that did not lead to a mutation.
    pub diagnostics: Vec<Diagnostic>,
}

impl PassResult {
    /// Create a result that records nothing.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Create a result with only changes.
    pub fn with_changes(changes: Vec<Change>) -> Self {
        Self {
            changes,
            diagnostics: Vec::new(),
        }
    }

    /// Merge this pass's bookkeeping into a report accumulator.
    pub fn merge_into_report(self, report: &mut Report) {
        report.changes.extend(self.changes);
        report.diagnostics.extend(self.diagnostics);
    }
}
