//! Pass 1: Inheritance & Discriminator Resolution
//!
//! Collapses `allOf` composition to a single parent: the first composed base
//! becomes `parent`, every other base is left out of the hierarchy (target
//! templates support single inheritance only) and reported as dropped.
//!
//! Generated polymorphic deserializers branch on the discriminator value, so
//! the discriminator property is forced to `required`. A discriminator that
//! names a property the model does not declare is left alone and surfaces as
//! a diagnostic.
//!
//! Running this pass twice yields the same registry.

use crate::model::{Model, Registry};
use crate::report::{Change, Diagnostic};

use super::pass_result::PassResult;

/// Resolve the parent and discriminator requirements of every model.
pub fn resolve_hierarchy(registry: &mut Registry) -> PassResult {
    let mut result = PassResult::unchanged();
    registry.for_each_model_mut(|unit, model| resolve_model(unit, model, &mut result));
    result
}

fn resolve_model(unit: &str, model: &mut Model, result: &mut PassResult) {
    assign_parent(unit, model, result);
    require_discriminator(unit, model, result);
}

/// `parent := composed_bases[0]`.
fn assign_parent(unit: &str, model: &mut Model, result: &mut PassResult) {
    let Some((first, rest)) = model.composed_bases.split_first() else {
        return;
    };

    if model.parent.as_deref() != Some(first.as_str()) {
        model.parent = Some(first.clone());
        result.changes.push(Change::ParentAssigned {
            unit: unit.to_string(),
            model: model.name.clone(),
            parent: first.clone(),
        });
    }

    if !rest.is_empty() {
        tracing::debug!(
            unit,
            model = %model.name,
            parent = %first,
            dropped = ?rest,
            "composition collapsed to single inheritance"
        );
        result.diagnostics.push(Diagnostic::BasesDropped {
            unit: unit.to_string(),
            model: model.name.clone(),
            dropped: rest.to_vec(),
        });
    }
}

/// Mark the first property named by the discriminator as required.
fn require_discriminator(unit: &str, model: &mut Model, result: &mut PassResult) {
    let Some(property_name) = model
        .discriminator
        .as_ref()
        .map(|d| d.property_name.clone())
    else {
        return;
    };

    match model
        .properties
        .iter_mut()
        .find(|p| p.name == property_name)
    {
        Some(property) => {
            if !property.required {
                property.required = true;
                result.changes.push(Change::DiscriminatorRequired {
                    unit: unit.to_string(),
                    model: model.name.clone(),
                    property: property_name,
                });
            }
        }
        None => {
            tracing::warn!(
                unit,
                model = %model.name,
                property = %property_name,
                "discriminator names a property the model does not declare"
            );
            result.diagnostics.push(Diagnostic::DanglingDiscriminator {
                unit: unit.to_string(),
                model: model.name.clone(),
                property: property_name,
            });
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
