//! Environment overrides live in their own test binary: they mutate
//! process-wide state.

use std::env;
use std::fs;

use tempfile::TempDir;

use skillsweb::config::Settings;

#[test]
fn given_env_vars_when_load_then_override_file_and_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("skillsweb.toml");
    fs::write(&path, "[labels]\nlimit = 12\n").unwrap();

    env::set_var("SKILLSWEB_LABELS__LIMIT", "20");
    env::set_var("SKILLSWEB_VISIBILITY__MAX_DEPTH", "8");
    env::set_var("SKILLSWEB_SUNBURST__PALETTE", "#000000,#ffffff");
    let settings = Settings::load(Some(&path));
    env::remove_var("SKILLSWEB_LABELS__LIMIT");
    env::remove_var("SKILLSWEB_VISIBILITY__MAX_DEPTH");
    env::remove_var("SKILLSWEB_SUNBURST__PALETTE");

    let settings = settings.expect("load settings");
    assert_eq!(settings.labels.limit, 20);
    assert_eq!(settings.visibility.max_depth, 8.0);
    assert_eq!(settings.sunburst.palette, vec!["#000000", "#ffffff"]);
}
