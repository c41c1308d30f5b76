//! Post-processing report — a record of what the passes changed.
//!
//! Renderers never need it; it exists so callers (and the CLI `--report`
//! sidecar) can audit lossy steps such as dropped composition bases.

use serde::{Deserialize, Serialize};

/// Everything the passes changed or noticed during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Ordered list of mutations, in the order the passes applied them.
    pub changes: Vec<Change>,
    /// Non-fatal findings. The registry was left untouched for these.
    pub diagnostics: Vec<Diagnostic>,
}

/// A single mutation applied to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Change {
    ImportRemoved {
        unit: String,
        model: String,
        import: String,
    },
    ParentAssigned {
        unit: String,
        model: String,
        parent: String,
    },
    DiscriminatorRequired {
        unit: String,
        model: String,
        property: String,
    },
}

/// A finding that did not lead to a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The discriminator names a property the model does not declare.
    DanglingDiscriminator {
        unit: String,
        model: String,
        property: String,
    },
    /// Composition bases beyond the first, not represented in the hierarchy.
    /// Reported on every run, whether or not `parent` was already set.
    BasesDropped {
        unit: String,
        model: String,
        dropped: Vec<String>,
    },
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports_removed(&self) -> usize {
        self.count(|c| matches!(c, Change::ImportRemoved { .. }))
    }

    pub fn parents_assigned(&self) -> usize {
        self.count(|c| matches!(c, Change::ParentAssigned { .. }))
    }

    pub fn discriminators_required(&self) -> usize {
        self.count(|c| matches!(c, Change::DiscriminatorRequired { .. }))
    }

    fn count(&self, pred: impl Fn(&Change) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }
}
