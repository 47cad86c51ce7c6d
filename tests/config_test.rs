//! Integration tests for Settings loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global → Explicit file: overlay wins where a key is present
//! - Any → Env vars: REPLACE (explicit user override, see config_env_test.rs)
//!
//! These tests only use explicit files in temp directories.

use std::fs;

use tempfile::TempDir;

use skillsweb::application::ApplicationError;
use skillsweb::config::Settings;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("skillsweb.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r##"
root_name = "Skills Atlas"

[labels]
limit = 12

[sunburst]
palette = ["#000000", "#ffffff"]
"##,
    );

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.root_name, "Skills Atlas");
    assert_eq!(settings.labels.limit, 12);
    assert_eq!(settings.sunburst.palette, vec!["#000000", "#ffffff"]);
    // untouched sections keep their defaults
    assert_eq!(settings.sunburst.radius, 150.0);
    assert_eq!(settings.viewport.zoom_in_factor, 1.2);
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();

    let err = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { ref message } if message.contains("not found")));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[labels\nlimit = 3");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_inverted_depth_band_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[visibility]\nmin_depth = 5.0\nmax_depth = 2.0\n");

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("min_depth"));
}

#[test]
fn given_template_when_written_and_loaded_then_equals_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &Settings::template());

    let settings = Settings::load(Some(&path)).unwrap();

    // only holds without a global config or SKILLSWEB_* overrides
    if skillsweb::config::global_config_path().is_some_and(|p| p.exists()) {
        return;
    }
    assert_eq!(settings, Settings::default());
}
