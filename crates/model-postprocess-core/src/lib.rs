//! Post-processing for generated client models.
//!
//! Runs after every model has been derived from the interface description and
//! before templates are rendered:
//!
//! 1. [`passes::p0_imports`] drops imports of models living in the same
//!    generation unit.
//! 2. [`passes::p1_hierarchy`] collapses `allOf` composition to a single
//!    parent and forces discriminator properties to be required.
//!
//! ```
//! use model_postprocess_core::{post_process, Model, PostProcessOptions, Property, Registry};
//!
//! let mut registry = Registry::new();
//! registry.insert("models", Model::new("Animal"));
//! registry.insert(
//!     "models",
//!     Model::new("Dog")
//!         .with_import("Animal")
//!         .with_base("Animal")
//!         .with_discriminator("kind")
//!         .with_property(Property::new("kind", false)),
//! );
//!
//! let report = post_process(&mut registry, &PostProcessOptions::default()).unwrap();
//! let dog = registry.model("models", "Dog").unwrap();
//! assert!(dog.imports.is_empty());
//! assert_eq!(dog.parent.as_deref(), Some("Animal"));
//! assert!(dog.property("kind").unwrap().required);
//! assert_eq!(report.imports_removed(), 1);
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod model;
pub mod passes;
pub mod report;

pub use check::{check_registry, Inconsistency};
pub use config::{
    AdditionalProperties, FeatureSet, GeneratorSettings, ImportPolicy, PostProcessOptions,
    SchemaSupportFeature, SerializationLibrary,
};
pub use error::PostProcessError;
pub use model::{Discriminator, GenerationUnit, Model, Property, Registry};
pub use report::{Change, Diagnostic, Report};

use passes::{p0_imports, p1_hierarchy};

/// Run every post-processing pass over `registry`, in place.
///
/// Never fails unless `options.strict` is set, in which case the first
/// [`Inconsistency`] found by [`check_registry`] is returned and the registry
/// is left untouched.
pub fn post_process(
    registry: &mut Registry,
    options: &PostProcessOptions,
) -> Result<Report, PostProcessError> {
    if options.strict {
        if let Some(issue) = check_registry(registry, &options.features)
            .into_iter()
            .next()
        {
            return Err(PostProcessError::SchemaInconsistency(issue));
        }
    }

    let mut report = Report::new();

    p0_imports::filter_imports(registry, options).merge_into_report(&mut report);
    p1_hierarchy::resolve_hierarchy(registry).merge_into_report(&mut report);

    tracing::info!(
        models = registry.model_count(),
        imports_removed = report.imports_removed(),
        parents_assigned = report.parents_assigned(),
        discriminators_required = report.discriminators_required(),
        diagnostics = report.diagnostics.len(),
        "post-processing complete"
    );

    Ok(report)
}

/// Parse a registry from JSON, post-process it, and return it as JSON
/// together with the report.
pub fn post_process_json(
    registry: &serde_json::Value,
    options: &PostProcessOptions,
) -> Result<(serde_json::Value, Report), PostProcessError> {
    let mut registry = Registry::from_json(registry)?;
    let report = post_process(&mut registry, options)?;
    Ok((serde_json::to_value(&registry)?, report))
}
