//! Domain entities: where taxonomy documents come from

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

/// Origin of a taxonomy or card document.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// JSON file on disk
    Path(PathBuf),
    /// JSON document fetched with one HTTP GET
    Url(String),
    /// Already parsed document
    Inline(Value),
}

impl DataSource {
    /// `http://` and `https://` strings become [`DataSource::Url`]; anything
    /// else is a path with `~`, `$VAR` and `${VAR}` expanded.
    pub fn from_path_str(path: &str) -> Self {
        if is_url(path) {
            return DataSource::Url(path.to_string());
        }
        DataSource::Path(PathBuf::from(expand_env_vars(path)))
    }
}

impl From<Value> for DataSource {
    fn from(value: Value) -> Self {
        DataSource::Inline(value)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Inline(_) => write!(f, "<inline>"),
        }
    }
}

fn is_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
///
/// Unknown variables leave the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tilde_when_building_path_source_then_expands_home() {
        let home = std::env::var("HOME").expect("HOME should be set");

        let source = DataSource::from_path_str("~/skills.json");

        assert_eq!(source, DataSource::Path(PathBuf::from(home).join("skills.json")));
    }

    #[test]
    fn given_http_strings_when_building_source_then_url_kept_verbatim() {
        for url in ["https://host/skills.json", "http://127.0.0.1:8080/data/skills.json"] {
            assert_eq!(DataSource::from_path_str(url), DataSource::Url(url.to_string()));
        }
        assert!(matches!(
            DataSource::from_path_str("data/https-mirror.json"),
            DataSource::Path(_)
        ));
    }

    #[test]
    fn given_inline_source_when_displayed_then_placeholder() {
        let source = DataSource::from(serde_json::json!({}));
        assert_eq!(source.to_string(), "<inline>");
    }
}
