//! Pass 0: Import Filter
//!
//! Every model of a generation unit is rendered into one shared namespace, so
//! an import of a sibling model is at best redundant and in some target
//! languages an illegal self-import. This pass drops those imports and leaves
//! everything else (runtime support types, SDK modules) in place.
//!
//! Import strings come in several shapes depending on the upstream parser:
//!
//! - bare type names (`Animal`) match a unit model by name;
//! - qualified names (`models.Animal`) match only when the qualifier is the
//!   unit's own name;
//! - file references (`package:api/model/pet_type.dart`) match only under the
//!   configured `model_import_prefix`, by model name or its `snake_case` stem.
//!
//! Anything else (`package:uuid/uuid.dart`, `dart:core`) is an external
//! import and is kept, even when its stem collides with a model name.

use std::collections::{BTreeSet, HashSet};

use heck::ToSnakeCase;

use crate::config::{ImportPolicy, PostProcessOptions};
use crate::model::{GenerationUnit, Registry};
use crate::report::Change;

use super::pass_result::PassResult;

/// Source-file extensions stripped from file-style imports.
const SOURCE_EXTENSIONS: &[&str] = &[".dart", ".rs", ".ts", ".py", ".java", ".kt", ".swift"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Remove imports that point at models of the same generation unit.
///
/// Filtering is per unit: a model in unit `a` keeps its import of a model
/// that only lives in unit `b`.
pub fn filter_imports(registry: &mut Registry, config: &PostProcessOptions) -> PassResult {
    if config.import_policy == ImportPolicy::FilterAll {
        tracing::warn!(
            "import policy filter-all drops every import, including runtime support types"
        );
    }

    let mut changes = Vec::new();
    for (unit_name, unit) in &mut registry.units {
        let members =
            UnitMembers::new(unit_name, unit, config.model_import_prefix.as_deref());

        for model in &mut unit.models {
            let (removed, kept): (BTreeSet<String>, BTreeSet<String>) =
                std::mem::take(&mut model.imports)
                    .into_iter()
                    .partition(|imp| match config.import_policy {
                        ImportPolicy::SameUnit => members.same_unit(imp),
                        ImportPolicy::FilterAll => true,
                    });
            model.imports = kept;

            for import in removed {
                tracing::debug!(
                    unit = %unit_name,
                    model = %model.name,
                    import = %import,
                    "dropping same-unit import"
                );
                changes.push(Change::ImportRemoved {
                    unit: unit_name.clone(),
                    model: model.name.clone(),
                    import,
                });
            }
        }
    }

    PassResult::with_changes(changes)
}

// ---------------------------------------------------------------------------
// Membership test
// ---------------------------------------------------------------------------

/// Names under which the models of one unit can be imported.
struct UnitMembers<'a> {
    unit: &'a str,
    names: HashSet<String>,
    file_stems: HashSet<String>,
    model_import_prefix: Option<&'a str>,
}

impl<'a> UnitMembers<'a> {
    fn new(
        name: &'a str,
        unit: &GenerationUnit,
        model_import_prefix: Option<&'a str>,
    ) -> Self {
        let names = unit.models.iter().map(|m| m.name.clone()).collect();
        let file_stems = unit.models.iter().map(|m| m.name.to_snake_case()).collect();
        Self {
            unit: name,
            names,
            file_stems,
            model_import_prefix: model_import_prefix.filter(|p| !p.is_empty()),
        }
    }

    /// Whether `import` denotes a model emitted into this unit.
    fn same_unit(&self, import: &str) -> bool {
        let import = import.trim();

        if let Some(rest) = self
            .model_import_prefix
            .and_then(|prefix| import.strip_prefix(prefix))
        {
            let stem = strip_source_extension(rest);
            return self.names.contains(stem) || self.file_stems.contains(stem);
        }

        if let Some((qualifier, name)) = import.rsplit_once('.') {
            if qualifier == self.unit && !name.contains(['/', ':']) {
                return self.names.contains(name);
            }
        }

        !import.contains(['/', ':', '.']) && self.names.contains(import)
    }
}

fn strip_source_extension(path: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}

// ===========================================================================
// Tests
// ===========================================================================
