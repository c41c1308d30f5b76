//! Configuration for model post-processing.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PostProcessError;

/// Key under which the generator's additional properties carry the library choice.
pub const SERIALIZATION_LIBRARY_KEY: &str = "serializationLibrary";

/// Free-form generator properties exposed to templates.
pub type AdditionalProperties = Map<String, Value>;

/// Serialization backend the generated client uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializationLibrary {
    /// Hand-written `fromJson`/`toJson`, backwards compatible.
    #[default]
    #[serde(rename = "native_serialization")]
    Native,
}

impl SerializationLibrary {
    pub const ALL: &'static [SerializationLibrary] = &[SerializationLibrary::Native];

    pub fn as_str(&self) -> &'static str {
        match self {
            SerializationLibrary::Native => "native_serialization",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SerializationLibrary::Native => "Use native serializer, backwards compatible",
        }
    }

    /// Resolve the configured library, falling back to [`SerializationLibrary::Native`]
    /// when nothing was configured.
    pub fn resolve(configured: Option<&str>) -> Result<Self, PostProcessError> {
        match configured {
            Some(name) => name.parse(),
            None => {
                let default = Self::default();
                tracing::debug!(
                    library = default.as_str(),
                    "serialization library not set, using default"
                );
                Ok(default)
            }
        }
    }

    /// Publish the template flag for this library.
    pub fn apply(&self, additional_properties: &mut AdditionalProperties) {
        tracing::info!(library = self.as_str(), "using serialization library");
        match self {
            SerializationLibrary::Native => {
                additional_properties.insert(
                    SerializationLibrary::Native.as_str().to_string(),
                    Value::String("true".to_string()),
                );
            }
        }
    }
}

impl fmt::Display for SerializationLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SerializationLibrary {
    type Err = PostProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|lib| lib.as_str() == s)
            .ok_or_else(|| PostProcessError::UnknownSerializationLibrary {
                name: s.to_string(),
            })
    }
}

/// How the import filter decides that an import points into the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportPolicy {
    /// Drop only imports naming a model of the same generation unit.
    #[default]
    SameUnit,
    /// Drop every import. Reproduces output of generators that treated all
    /// imports as same-unit, including runtime support imports.
    FilterAll,
}

/// Schema composition constructs accepted upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaSupportFeature {
    Polymorphism,
    Union,
    Composite,
    AllOf,
    OneOf,
    AnyOf,
}

/// Set of enabled [`SchemaSupportFeature`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<SchemaSupportFeature>);

impl FeatureSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Everything a polymorphic client generator enables.
    pub fn client_defaults() -> Self {
        [
            SchemaSupportFeature::Polymorphism,
            SchemaSupportFeature::Union,
            SchemaSupportFeature::Composite,
            SchemaSupportFeature::AllOf,
            SchemaSupportFeature::OneOf,
            SchemaSupportFeature::AnyOf,
        ]
        .into_iter()
        .collect()
    }

    pub fn include(mut self, feature: SchemaSupportFeature) -> Self {
        self.0.insert(feature);
        self
    }

    pub fn contains(&self, feature: SchemaSupportFeature) -> bool {
        self.0.contains(&feature)
    }
}

impl FromIterator<SchemaSupportFeature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = SchemaSupportFeature>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Options for model post-processing.
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `import-policy`,
/// `serialization-library`), matching the rest of the generator config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PostProcessOptions {
    /// Carried through to template rendering via [`GeneratorSettings`]; the
    /// passes do not read it.
    pub serialization_library: SerializationLibrary,
    pub import_policy: ImportPolicy,
    /// Path prefix under which this generator emits model files, e.g.
    /// `package:petstore/model/`. File-style imports are only matched
    /// against unit models when they start with it.
    #[serde(default)]
    pub model_import_prefix: Option<String>,
    pub features: FeatureSet,
    /// Run the consistency check first and fail on the first issue.
    pub strict: bool,
}

impl Default for PostProcessOptions {
    fn default() -> Self {
        Self {
            serialization_library: SerializationLibrary::Native,
            import_policy: ImportPolicy::SameUnit,
            model_import_prefix: None,
            features: FeatureSet::client_defaults(),
            strict: false,
        }
    }
}

/// Options resolved from the generator's additional properties.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub options: PostProcessOptions,
    /// Input properties plus the template flags published for the chosen options.
    pub additional_properties: AdditionalProperties,
}

impl GeneratorSettings {
    /// Resolve options from `additional_properties` and publish the matching
    /// template flags.
    ///
    /// A `null` under [`SERIALIZATION_LIBRARY_KEY`] counts as unset. Other
    /// non-string values are matched by their JSON text.
    pub fn from_additional_properties(
        mut additional_properties: AdditionalProperties,
    ) -> Result<Self, PostProcessError> {
        let configured = match additional_properties.get(SERIALIZATION_LIBRARY_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        let library = SerializationLibrary::resolve(configured.as_deref())?;
        library.apply(&mut additional_properties);

        Ok(Self {
            options: PostProcessOptions {
                serialization_library: library,
                ..PostProcessOptions::default()
            },
            additional_properties,
        })
    }
}
