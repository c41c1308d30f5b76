//! Integration tests for the `post_process()` pipeline — exercises both passes
//! via the public API only, never calling individual passes directly.

use model_postprocess_core::{
    post_process, post_process_json, Diagnostic, FeatureSet, ImportPolicy, Inconsistency,
    Model, PostProcessError, PostProcessOptions, Property, Registry,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeSet;

fn options() -> PostProcessOptions {
    PostProcessOptions::default()
}

fn strict_options() -> PostProcessOptions {
    PostProcessOptions {
        strict: true,
        ..PostProcessOptions::default()
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ── Import filtering ────────────────────────────────────────────────────────

#[test]
fn test_sibling_import_dropped_runtime_import_kept() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Animal"));
    registry.insert(
        "models",
        Model::new("Dog").with_import("Animal").with_import("http_client"),
    );

    post_process(&mut registry, &options()).expect("post_process should succeed");

    let dog = registry.model("models", "Dog").unwrap();
    assert_eq!(dog.imports, set(&["http_client"]));
    assert!(dog.parent.is_none());
}

#[test]
fn test_filter_all_policy_reproduces_legacy_output() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Animal"));
    registry.insert(
        "models",
        Model::new("Dog").with_import("Animal").with_import("http_client"),
    );
    let legacy = PostProcessOptions {
        import_policy: ImportPolicy::FilterAll,
        ..PostProcessOptions::default()
    };

    let report = post_process(&mut registry, &legacy).unwrap();

    assert!(registry.model("models", "Dog").unwrap().imports.is_empty());
    assert_eq!(report.imports_removed(), 2);
}

#[test]
fn test_package_imports_survive_colliding_model_names() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Uuid"));
    registry.insert("models", Model::new("Http"));
    registry.insert(
        "models",
        Model::new("Pet")
            .with_import("Uuid")
            .with_import("package:uuid/uuid.dart")
            .with_import("package:http/http.dart")
            .with_import("other_unit.Http"),
    );

    let report = post_process(&mut registry, &options()).unwrap();

    assert_eq!(
        registry.model("models", "Pet").unwrap().imports,
        set(&["other_unit.Http", "package:http/http.dart", "package:uuid/uuid.dart"])
    );
    assert_eq!(report.imports_removed(), 1);
}

// ── Hierarchy ───────────────────────────────────────────────────────────────

#[test]
fn test_single_base_becomes_parent() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Pet").with_base("Animal"));

    post_process(&mut registry, &options()).unwrap();

    assert_eq!(
        registry.model("models", "Pet").unwrap().parent.as_deref(),
        Some("Animal")
    );
}

#[test]
fn test_two_bases_keep_only_first() {
    let mut registry = Registry::new();
    registry.insert(
        "models",
        Model::new("Pet").with_base("Animal").with_base("Named"),
    );

    let report = post_process(&mut registry, &options()).unwrap();

    assert_eq!(
        registry.model("models", "Pet").unwrap().parent.as_deref(),
        Some("Animal")
    );
    assert!(report
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::BasesDropped { dropped, .. } if dropped == &["Named".to_string()])));
}

#[test]
fn test_dropped_bases_reported_on_every_run() {
    let mut registry = Registry::new();
    registry.insert(
        "models",
        Model::new("Pet").with_base("Animal").with_base("Named"),
    );

    let first = post_process(&mut registry, &options()).unwrap();
    let second = post_process(&mut registry, &options()).unwrap();

    assert!(second.changes.is_empty());
    assert_eq!(first.diagnostics, second.diagnostics);
    assert_eq!(
        second.diagnostics,
        vec![Diagnostic::BasesDropped {
            unit: "models".to_string(),
            model: "Pet".to_string(),
            dropped: vec!["Named".to_string()],
        }]
    );
}

#[test]
fn test_discriminator_forced_required() {
    let mut registry = Registry::new();
    registry.insert(
        "models",
        Model::new("Pet")
            .with_discriminator("petType")
            .with_property(Property::new("petType", false))
            .with_property(Property::new("name", true)),
    );

    let report = post_process(&mut registry, &options()).unwrap();

    let pet = registry.model("models", "Pet").unwrap();
    assert!(pet.property("petType").unwrap().required);
    assert!(pet.property("name").unwrap().required);
    assert_eq!(report.discriminators_required(), 1);
}

#[test]
fn test_dangling_discriminator_leaves_model_unchanged() {
    let original = Model::new("Pet")
        .with_discriminator("kind")
        .with_property(Property::new("name", false));
    let mut registry = Registry::new();
    registry.insert("models", original.clone());

    let report = post_process(&mut registry, &options()).expect("dangling is not an error");

    assert_eq!(registry.model("models", "Pet").unwrap(), &original);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::DanglingDiscriminator {
            unit: "models".to_string(),
            model: "Pet".to_string(),
            property: "kind".to_string(),
        }]
    );
}

#[test]
fn test_empty_registry_unchanged() {
    let mut registry = Registry::new();
    let report = post_process(&mut registry, &options()).unwrap();
    assert_eq!(registry, Registry::new());
    assert!(report.changes.is_empty());
    assert!(report.diagnostics.is_empty());
}

// ── Strict mode ─────────────────────────────────────────────────────────────

#[test]
fn test_strict_rejects_dangling_discriminator() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Pet").with_discriminator("kind"));
    let before = registry.clone();

    let err = post_process(&mut registry, &strict_options()).unwrap_err();

    assert!(matches!(
        err,
        PostProcessError::SchemaInconsistency(Inconsistency::DiscriminatorPropertyMissing { .. })
    ));
    assert_eq!(registry, before, "strict failure must not mutate");
}

#[test]
fn test_strict_rejects_disabled_feature() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Pet").with_base("Animal"));
    let opts = PostProcessOptions {
        strict: true,
        features: FeatureSet::empty(),
        ..PostProcessOptions::default()
    };

    assert!(post_process(&mut registry, &opts).is_err());
}

#[test]
fn test_strict_accepts_consistent_registry() {
    let mut registry = Registry::new();
    registry.insert("models", Model::new("Animal"));
    registry.insert(
        "models",
        Model::new("Cat")
            .with_base("Animal")
            .with_discriminator("kind")
            .with_property(Property::new("kind", false)),
    );

    post_process(&mut registry, &strict_options()).expect("consistent registry passes");
    assert!(registry.model("models", "Cat").unwrap().property("kind").unwrap().required);
}

// ── JSON entry point ────────────────────────────────────────────────────────

#[test]
fn test_post_process_json_round_trip_shape() {
    let input = json!({
        "models": {
            "models": [
                { "name": "Animal", "properties": [{ "name": "kind", "required": false, "type": "String" }] },
                {
                    "name": "Dog",
                    "imports": ["Animal", "package:http/http.dart"],
                    "composedBases": ["Animal"],
                    "discriminator": { "propertyName": "kind" },
                    "properties": [{ "name": "kind", "required": false, "type": "String" }]
                }
            ]
        }
    });

    let (output, report) = post_process_json(&input, &options()).unwrap();

    let dog = &output["models"]["models"][1];
    assert_eq!(dog["parent"], json!("Animal"));
    assert_eq!(dog["imports"], json!(["package:http/http.dart"]));
    assert_eq!(dog["properties"][0]["required"], json!(true));
    assert_eq!(dog["properties"][0]["type"], json!("String"));
    assert_eq!(report.parents_assigned(), 1);
}

#[test]
fn test_post_process_json_rejects_malformed_registry() {
    let input = json!({ "models": { "models": [{ "properties": [] }] } });
    let err = post_process_json(&input, &options()).unwrap_err();
    assert!(matches!(err, PostProcessError::JsonError(_)));
}

// ── Observability ───────────────────────────────────────────────────────────

#[test]
fn test_runs_under_scoped_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();

    let mut registry = Registry::new();
    registry.insert("models", Model::new("Pet").with_discriminator("kind"));

    let report = tracing::subscriber::with_default(subscriber, || {
        post_process(&mut registry, &options()).unwrap()
    });
    assert_eq!(report.diagnostics.len(), 1);
}
