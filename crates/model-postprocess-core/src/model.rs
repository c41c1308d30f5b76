//! Model registry types.
//!
//! A [`Registry`] maps generation-unit names to the models emitted into that
//! unit. Models are built upstream from the parsed interface description,
//! mutated in place by the passes in [`crate::passes`], and then handed to
//! template rendering as read-only data.
//!
//! ## Serialization Format
//!
//! Fields are serialized in `camelCase` (`composedBases`, `propertyName`).
//! Every collection defaults to empty so producers may omit them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PostProcessError;

/// All models of one generator run, keyed by generation-unit name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    pub units: BTreeMap<String, GenerationUnit>,
}

/// Models co-located in one namespace / output directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationUnit {
    #[serde(default)]
    pub models: Vec<Model>,
}

/// One generated type.
///
/// Property names are expected to be unique within a model. When they are
/// not, passes that look a property up by name act on the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Ordered set so rendered import lists are stable across runs.
    #[serde(default)]
    pub imports: BTreeSet<String>,
    /// Bases from `allOf` composition, in declaration order.
    #[serde(default)]
    pub composed_bases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
}

/// A field of a generated type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    /// Type descriptor, carried through untouched.
    #[serde(default, rename = "type", skip_serializing_if = "Value::is_null")]
    pub data_type: Value,
}

/// Names the property whose value selects the concrete subtype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    pub property_name: String,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from its JSON representation.
    pub fn from_json(value: &Value) -> Result<Self, PostProcessError> {
        Ok(Self::deserialize(value)?)
    }

    /// Add a model to `unit`, creating the unit if needed.
    pub fn insert(&mut self, unit: impl Into<String>, model: Model) {
        self.units.entry(unit.into()).or_default().models.push(model);
    }

    pub fn is_empty(&self) -> bool {
        self.units.values().all(|unit| unit.models.is_empty())
    }

    /// Total number of models across all units.
    pub fn model_count(&self) -> usize {
        self.units.values().map(|unit| unit.models.len()).sum()
    }

    /// Look up a model by unit and name.
    pub fn model(&self, unit: &str, name: &str) -> Option<&Model> {
        self.units
            .get(unit)?
            .models
            .iter()
            .find(|model| model.name == name)
    }

    /// Iterate `(unit name, model)` pairs.
    pub fn iter_models(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.units
            .iter()
            .flat_map(|(name, unit)| unit.models.iter().map(move |m| (name.as_str(), m)))
    }

    /// Visit every model mutably, together with its unit name.
    pub fn for_each_model_mut(&mut self, mut f: impl FnMut(&str, &mut Model)) {
        for (name, unit) in &mut self.units {
            for model in &mut unit.models {
                f(name, model);
            }
        }
    }
}

impl GenerationUnit {
    /// Names of every model emitted into this unit.
    pub fn model_names(&self) -> BTreeSet<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.insert(import.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.composed_bases.push(base.into());
        self
    }

    pub fn with_discriminator(mut self, property_name: impl Into<String>) -> Self {
        self.discriminator = Some(Discriminator {
            property_name: property_name.into(),
        });
        self
    }

    /// First property named `name`.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }
}

impl Property {
    pub fn new(name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            required,
            data_type: Value::Null,
        }
    }

    pub fn with_type(mut self, data_type: Value) -> Self {
        self.data_type = data_type;
        self
    }
}
