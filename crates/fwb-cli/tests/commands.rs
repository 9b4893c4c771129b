//! Integration tests for the subcommand implementations.

use std::path::{Path, PathBuf};

use fwb_cli::commands::{
    SaveTarget, run_compose, run_import, run_load, run_plan, run_replay, run_save,
};
use fwb_cli::inputs::ServiceSource;
use fwb_cli::settings::Settings;
use fwb_core::WorkbenchConfig;
use tempfile::TempDir;

const PRODUCTS: &str = r#"type Query {
  topProducts: [Product]
}

type Product @key(fields: "upc") {
  upc: String!
  name: String
}
"#;

const REVIEWS: &str = r#"type Review {
  body: String
}

extend type Product @key(fields: "upc") {
  upc: String! @external
  reviews: [Review]
}
"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn shop(dir: &Path) -> Vec<ServiceSource> {
    let products = write(dir, "products.graphql", PRODUCTS);
    let reviews = write(dir, "reviews.graphql", REVIEWS);
    vec![
        products.to_str().unwrap().parse().unwrap(),
        format!("reviews={}", reviews.display()).parse().unwrap(),
    ]
}

#[test]
fn test_compose_prints_supergraph() {
    let dir = TempDir::new().unwrap();
    let report = run_compose(&shop(dir.path())).unwrap();

    assert!(!report.has_errors());
    assert!(report.composed.contains("reviews: [Review]"));
    assert_eq!(report.selection.as_deref(), Some("products"));
    assert_eq!(report.services.len(), 2);
}

#[test]
fn test_compose_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let broken = write(dir.path(), "broken.graphql", "type Query {");
    let sources = vec![broken.to_str().unwrap().parse().unwrap()];

    let report = run_compose(&sources).unwrap();
    assert!(report.has_errors());
    assert!(report.composed.is_empty());
    assert!(report.errors[0].starts_with("[broken] "));
}

#[test]
fn test_missing_service_file_is_an_error() {
    let sources = vec!["ghost=/nonexistent/ghost.graphql".parse().unwrap()];
    let error = run_compose(&sources).unwrap_err();
    assert!(format!("{error:#}").contains("ghost"));
}

#[test]
fn test_plan_spans_services() {
    let dir = TempDir::new().unwrap();
    let query = write(
        dir.path(),
        "query.graphql",
        "{ topProducts { name reviews { body } } }",
    );

    let report = run_plan(&query, &shop(dir.path())).unwrap();
    assert!(!report.has_errors());
    assert!(report.plan.contains("Fetch(service: \"products\")"));
    assert!(report.plan.contains("Fetch(service: \"reviews\")"));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let query = write(dir.path(), "query.graphql", "{ topProducts { upc } }");
    let target = SaveTarget {
        name: "Shop".to_string(),
        out_dir: dir.path().join("snapshots"),
    };

    let saved = run_save(&shop(dir.path()), Some(&query), &target).unwrap();
    let path = saved.saved_to.clone().unwrap();
    let file_name = path.file_name().unwrap().to_str().unwrap();
    assert!(file_name.starts_with("Shop-"));
    assert!(file_name.ends_with(".federationworkbench"));

    let loaded = run_load(&path).unwrap();
    assert_eq!(loaded.services, saved.services);
    assert_eq!(loaded.composed, saved.composed);
    assert_eq!(loaded.query, "{ topProducts { upc } }");
    assert_eq!(loaded.plan, saved.plan);
}

#[test]
fn test_load_rejects_other_extensions() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "session.json", "{}");
    assert!(run_load(&path).is_err());
}

#[test]
fn test_import_remote_services() {
    let dir = TempDir::new().unwrap();
    let response = serde_json::json!({ "products": PRODUCTS, "reviews": REVIEWS });
    let path = write(dir.path(), "remote.json", &response.to_string());
    let target = SaveTarget {
        name: "Remote".to_string(),
        out_dir: dir.path().to_path_buf(),
    };

    let report = run_import(&path, Some(&target)).unwrap();
    assert!(!report.has_errors());
    assert_eq!(report.selection, None);
    assert!(report.composed.contains("type Review"));
    assert!(report.saved_to.unwrap().exists());
}

#[tokio::test]
async fn test_replay_action_log() {
    let dir = TempDir::new().unwrap();
    let lines = [
        serde_json::json!({ "type": "addService", "payload": { "name": "products" } }),
        serde_json::json!({ "type": "updateService", "payload": { "name": "products", "value": PRODUCTS } }),
        serde_json::json!({ "type": "addService", "payload": { "name": "reviews" } }),
        serde_json::json!({ "type": "updateService", "payload": { "name": "reviews", "value": REVIEWS } }),
        serde_json::json!({ "type": "updateQuery", "payload": "{ topProducts { reviews { body } } }" }),
        serde_json::json!({ "type": "loadWorkbench", "payload": "not a snapshot" }),
        serde_json::json!({ "type": "saveWorkbench", "payload": "Replayed" }),
    ];
    let log: String = lines.iter().map(|line| format!("{line}\n\n")).collect();
    let path = write(dir.path(), "actions.jsonl", &log);
    let config = WorkbenchConfig {
        debounce: std::time::Duration::from_millis(5),
        offload: true,
    };

    let report = run_replay(&path, config, dir.path()).await.unwrap();
    assert!(!report.has_errors(), "{:?}", report.errors);
    assert!(report.composed.contains("type Review"));
    assert!(report.plan.contains("Fetch(service: \"reviews\")"));

    let saved = report.saved_to.clone().unwrap();
    assert!(
        saved
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("Replayed-"))
    );
    let loaded = run_load(&saved).unwrap();
    assert_eq!(loaded.plan, report.plan);
}

#[tokio::test]
async fn test_replay_rejects_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "actions.jsonl", "{\"type\":\"undo\"}\n");

    let error = run_replay(&path, WorkbenchConfig::default(), dir.path())
        .await
        .unwrap_err();
    assert!(format!("{error:#}").contains("actions.jsonl:1"));
}

#[test]
fn test_settings_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "settings.toml",
        "[session]\ndebounce_ms = 10\n\n[snapshot]\ndefault_name = \"Shop\"\n",
    );

    let settings = Settings::load_from(&path);
    assert_eq!(settings.session.debounce_ms, 10);
    assert!(settings.session.offload);
    assert_eq!(settings.snapshot.default_name, "Shop");
    assert_eq!(settings.snapshot.output_dir, PathBuf::from("."));

    let invalid = write(dir.path(), "invalid.toml", "[session\n");
    assert_eq!(Settings::load_from(&invalid), Settings::default());
}
