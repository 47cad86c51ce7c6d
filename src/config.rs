//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/skillsweb/skillsweb.toml`
//! 3. Explicit config file (`--config <FILE>`)
//! 4. Environment variables: `SKILLSWEB_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::label::DEFAULT_LABEL_LIMIT;
use crate::domain::taxonomy::DEFAULT_ROOT_NAME;
use crate::domain::{VisibilityRules, ViewportLimits};

/// Label wrapping settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelConfig {
    /// Character budget per label line
    pub limit: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LABEL_LIMIT,
        }
    }
}

/// Sunburst presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunburstConfig {
    /// Pixels per depth unit
    pub radius: f64,
    /// Colours cycled over the top-level categories
    pub palette: Vec<String>,
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            palette: vec![
                "#38bdf8".into(),
                "#818cf8".into(),
                "#c084fc".into(),
                "#fb7185".into(),
                "#34d399".into(),
            ],
        }
    }
}

impl SunburstConfig {
    /// Palette entry for a top-level slot, cycling when there are more
    /// categories than colours.
    pub fn colour(&self, slot: usize) -> Option<&str> {
        if self.palette.is_empty() {
            None
        } else {
            Some(self.palette[slot % self.palette.len()].as_str())
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_name: Option<String>,
    pub labels: RawLabelConfig,
    pub visibility: RawVisibility,
    pub viewport: RawViewport,
    pub sunburst: RawSunburst,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLabelConfig {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawVisibility {
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    pub label_min_area: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawViewport {
    pub rotation_step: Option<f64>,
    pub zoom_in_factor: Option<f64>,
    pub zoom_out_factor: Option<f64>,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSunburst {
    pub radius: Option<f64>,
    pub palette: Option<Vec<String>>,
}

/// Unified configuration for skillsweb.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Display name of the hub node
    pub root_name: String,
    pub labels: LabelConfig,
    pub visibility: VisibilityRules,
    pub viewport: ViewportLimits,
    pub sunburst: SunburstConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            labels: LabelConfig::default(),
            visibility: VisibilityRules::default(),
            viewport: ViewportLimits::default(),
            sunburst: SunburstConfig::default(),
        }
    }
}

/// Get the XDG config directory for skillsweb.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skillsweb").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("skillsweb.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        let v = &overlay.visibility;
        let vp = &overlay.viewport;
        Self {
            root_name: overlay
                .root_name
                .clone()
                .unwrap_or_else(|| self.root_name.clone()),
            labels: LabelConfig {
                limit: overlay.labels.limit.unwrap_or(self.labels.limit),
            },
            visibility: VisibilityRules {
                min_depth: v.min_depth.unwrap_or(self.visibility.min_depth),
                max_depth: v.max_depth.unwrap_or(self.visibility.max_depth),
                label_min_area: v.label_min_area.unwrap_or(self.visibility.label_min_area),
            },
            viewport: ViewportLimits {
                rotation_step: vp.rotation_step.unwrap_or(self.viewport.rotation_step),
                zoom_in_factor: vp.zoom_in_factor.unwrap_or(self.viewport.zoom_in_factor),
                zoom_out_factor: vp.zoom_out_factor.unwrap_or(self.viewport.zoom_out_factor),
                min_scale: vp.min_scale.unwrap_or(self.viewport.min_scale),
                max_scale: vp.max_scale.unwrap_or(self.viewport.max_scale),
            },
            sunburst: SunburstConfig {
                radius: overlay.sunburst.radius.unwrap_or(self.sunburst.radius),
                palette: overlay
                    .sunburst
                    .palette
                    .clone()
                    .unwrap_or_else(|| self.sunburst.palette.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/skillsweb/skillsweb.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `SKILLSWEB_*`
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply SKILLSWEB_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("SKILLSWEB")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sunburst.palette")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("root_name") {
            settings.root_name = val;
        }
        if let Ok(val) = config.get_int("labels.limit") {
            settings.labels.limit = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("labels.limit must not be negative: {val}"),
            })?;
        }
        let floats: [(&str, &mut f64); 9] = [
            ("visibility.min_depth", &mut settings.visibility.min_depth),
            ("visibility.max_depth", &mut settings.visibility.max_depth),
            ("visibility.label_min_area", &mut settings.visibility.label_min_area),
            ("viewport.rotation_step", &mut settings.viewport.rotation_step),
            ("viewport.zoom_in_factor", &mut settings.viewport.zoom_in_factor),
            ("viewport.zoom_out_factor", &mut settings.viewport.zoom_out_factor),
            ("viewport.min_scale", &mut settings.viewport.min_scale),
            ("viewport.max_scale", &mut settings.viewport.max_scale),
            ("sunburst.radius", &mut settings.sunburst.radius),
        ];
        for (key, slot) in floats {
            if let Ok(val) = config.get_float(key) {
                *slot = val;
            }
        }
        if let Ok(val) = config.get::<Vec<String>>("sunburst.palette") {
            settings.sunburst.palette = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        let invalid = |message: String| Err(ApplicationError::Config { message });
        if self.visibility.min_depth > self.visibility.max_depth {
            return invalid(format!(
                "visibility.min_depth ({}) exceeds visibility.max_depth ({})",
                self.visibility.min_depth, self.visibility.max_depth
            ));
        }
        if self.viewport.min_scale <= 0.0 || self.viewport.min_scale > self.viewport.max_scale {
            return invalid(format!(
                "viewport scale range [{}, {}] is empty or not positive",
                self.viewport.min_scale, self.viewport.max_scale
            ));
        }
        if self.labels.limit == 0 {
            return invalid("labels.limit must be at least 1".to_string());
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# skillsweb configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/skillsweb/skillsweb.toml
#   Explicit: skillsweb --config <FILE>
#   Env:      SKILLSWEB_* environment variables, e.g. SKILLSWEB_LABELS__LIMIT=20

# Display name of the hub node
# root_name = "Waal Bridge"

[labels]
# Characters per label line before wrapping
# limit = 16

[visibility]
# Rings drawn: arcs whose depth span lies within [min_depth, max_depth]
# min_depth = 1.0
# max_depth = 6.0
# Labels only for arcs whose angle x depth area exceeds this
# label_min_area = 0.03

[viewport]
# rotation_step = 30.0
# zoom_in_factor = 1.2
# zoom_out_factor = 0.8
# min_scale = 0.5
# max_scale = 4.0

[sunburst]
# radius = 150.0
# palette = ["#38bdf8", "#818cf8", "#c084fc", "#fb7185", "#34d399"]
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_then_match_original_tuning() {
        let settings = Settings::default();

        assert_eq!(settings.root_name, "Waal Bridge");
        assert_eq!(settings.labels.limit, 16);
        assert_eq!(settings.visibility.max_depth, 6.0);
        assert_eq!(settings.visibility.label_min_area, 0.03);
        assert_eq!(settings.viewport.rotation_step, 30.0);
        assert_eq!(settings.sunburst.palette.len(), 5);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_kept() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str(
            r#"
root_name = "Skills"
[visibility]
max_depth = 4.0
"#,
        )
        .unwrap();

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.root_name, "Skills");
        assert_eq!(merged.visibility.max_depth, 4.0);
        assert_eq!(merged.visibility.min_depth, 1.0);
        assert_eq!(merged.labels.limit, 16);
        assert_eq!(merged.sunburst, SunburstConfig::default());
    }

    #[test]
    fn given_palette_when_picking_colour_then_cycles() {
        let sunburst = SunburstConfig::default();

        assert_eq!(sunburst.colour(0), Some("#38bdf8"));
        assert_eq!(sunburst.colour(6), Some("#818cf8"));
        assert_eq!(SunburstConfig { radius: 1.0, palette: vec![] }.colour(0), None);
    }

    #[test]
    fn given_inverted_band_when_validating_then_rejected() {
        let mut settings = Settings::default();
        settings.visibility.min_depth = 7.0;

        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_defaults_when_serializing_then_round_trips_through_template_keys() {
        let toml = Settings::default().to_toml().unwrap();

        assert!(toml.contains("root_name = \"Waal Bridge\""));
        assert!(toml.contains("[visibility]"));
        let template: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(template.root_name.is_none());
    }
}
