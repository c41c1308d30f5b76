//! Registry consistency check.
//!
//! The passes silently tolerate dangling discriminators and lossy multi-base
//! composition. Callers that want those surfaced as errors run this check
//! first (or set `strict` in [`crate::PostProcessOptions`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{FeatureSet, SchemaSupportFeature};
use crate::model::{Model, Registry};

/// A registry defect the passes would otherwise paper over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inconsistency {
    /// Discriminator property not found among the model's properties.
    DiscriminatorPropertyMissing {
        unit: String,
        model: String,
        property: String,
    },
    /// More than one composed base; only the first survives resolution.
    MultipleBases {
        unit: String,
        model: String,
        bases: Vec<String>,
    },
    /// The model relies on a construct the generator does not enable.
    UnsupportedFeature {
        unit: String,
        model: String,
        feature: SchemaSupportFeature,
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::DiscriminatorPropertyMissing {
                unit,
                model,
                property,
            } => write!(
                f,
                "{unit}/{model}: discriminator property '{property}' not found"
            ),
            Inconsistency::MultipleBases { unit, model, bases } => write!(
                f,
                "{unit}/{model}: composes {} bases ({}), only the first is kept",
                bases.len(),
                bases.join(", ")
            ),
            Inconsistency::UnsupportedFeature {
                unit,
                model,
                feature,
            } => write!(f, "{unit}/{model}: uses unsupported feature {feature:?}"),
        }
    }
}

/// Collect every inconsistency in `registry`, in registry order.
pub fn check_registry(registry: &Registry, features: &FeatureSet) -> Vec<Inconsistency> {
    let mut issues = Vec::new();
    for (unit, model) in registry.iter_models() {
        check_model(unit, model, features, &mut issues);
    }
    issues
}

fn check_model(unit: &str, model: &Model, features: &FeatureSet, issues: &mut Vec<Inconsistency>) {
    if !model.composed_bases.is_empty() {
        if !features.contains(SchemaSupportFeature::AllOf) {
            issues.push(Inconsistency::UnsupportedFeature {
                unit: unit.to_string(),
                model: model.name.clone(),
                feature: SchemaSupportFeature::AllOf,
            });
        }
        if model.composed_bases.len() > 1 {
            issues.push(Inconsistency::MultipleBases {
                unit: unit.to_string(),
                model: model.name.clone(),
                bases: model.composed_bases.clone(),
            });
        }
    }

    if let Some(discriminator) = &model.discriminator {
        if !features.contains(SchemaSupportFeature::Polymorphism) {
            issues.push(Inconsistency::UnsupportedFeature {
                unit: unit.to_string(),
                model: model.name.clone(),
                feature: SchemaSupportFeature::Polymorphism,
            });
        }
        if model.property(&discriminator.property_name).is_none() {
            issues.push(Inconsistency::DiscriminatorPropertyMissing {
                unit: unit.to_string(),
                model: model.name.clone(),
                property: discriminator.property_name.clone(),
            });
        }
    }
}
