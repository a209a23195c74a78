//! Config discovery and registry edits flowing through to scores

use riskhub_core::config::load_and_resolve;
use riskhub_core::{score_with_registry, summarize, Portfolio, ProfileRegistry, RiskWeightProfile};
use std::fs;
use std::path::PathBuf;

fn fixture_portfolio() -> Portfolio {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests/fixtures/portfolio.json");
    Portfolio::load(&path).unwrap()
}

fn rix_of(portfolio: &Portfolio, registry: &ProfileRegistry, id: &str) -> u8 {
    score_with_registry(portfolio.find(id).unwrap(), registry)
}

#[test]
fn test_discovered_config_replaces_default_profile() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("riskhub.config.json"),
        r#"{"profiles": {"default": {"label": "Finance Only", "fri": 1.0, "dri": 0.0, "cii": 0.0, "gsi": 0.0}}}"#,
    )
    .unwrap();

    let resolved = load_and_resolve(dir.path(), None).unwrap();
    assert_eq!(
        resolved.config_path,
        Some(dir.path().join("riskhub.config.json"))
    );

    let portfolio = fixture_portfolio();
    assert_eq!(rix_of(&portfolio, &resolved.registry, "PRJ-002"), 55);
    assert_eq!(rix_of(&portfolio, &resolved.registry, "PRJ-004"), 14);
    // Projects on other profiles are untouched
    assert_eq!(rix_of(&portfolio, &resolved.registry, "PRJ-003"), 89);
}

#[test]
fn test_invalid_config_is_rejected_before_scoring() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".riskhubrc.json"),
        r#"{"profiles": {"erp": {"fri": 0.5, "dri": 0.5, "cii": 0.5, "gsi": 0.5}}}"#,
    )
    .unwrap();

    let err = load_and_resolve(dir.path(), None).unwrap_err();
    assert!(format!("{:#}", err).contains(".riskhubrc.json"));
}

#[test]
fn test_missing_config_uses_stock_registry() {
    let dir = tempfile::tempdir().unwrap();
    let resolved = load_and_resolve(dir.path(), None).unwrap();
    assert!(resolved.config_path.is_none());

    let summary = summarize(&fixture_portfolio().projects, &resolved.registry);
    assert_eq!(summary.mean_rix, 44.6);
}

#[test]
fn test_created_profile_scores_with_equal_weights() {
    let mut registry = ProfileRegistry::default();
    let key = registry.create("Data Platform").unwrap();
    assert_eq!(key, "data_platform");

    let mut portfolio = fixture_portfolio();
    for project in &mut portfolio.projects {
        if project.id == "PRJ-002" {
            project.profile = key.clone();
        }
    }
    // (55 + 63 + 71 + 48) / 4 = 59.25
    assert_eq!(rix_of(&portfolio, &registry, "PRJ-002"), 59);
}

#[test]
fn test_edited_profile_changes_later_scores() {
    let portfolio = fixture_portfolio();
    let mut registry = ProfileRegistry::default();
    let before = rix_of(&portfolio, &registry, "PRJ-005");

    let replaced = registry
        .insert("cloud", RiskWeightProfile::new("Cloud", 0.0, 1.0, 0.0, 0.0))
        .unwrap();
    assert!(replaced.is_some());
    assert_eq!(rix_of(&portfolio, &registry, "PRJ-005"), 49);
    assert_ne!(before, 49);
}
