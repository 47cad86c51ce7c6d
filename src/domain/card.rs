//! Flip card: record and interaction state

use serde::{Deserialize, Serialize};

pub const DEFAULT_FRONT_BACKGROUND: &str = "#fff";

/// Flat record shown on a two-sided card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_image: Option<String>,
    #[serde(
        default,
        rename = "frontBackgroundColor",
        skip_serializing_if = "Option::is_none"
    )]
    pub front_background_color: Option<String>,
}

impl CardRecord {
    pub fn front_background(&self) -> &str {
        self.front_background_color
            .as_deref()
            .unwrap_or(DEFAULT_FRONT_BACKGROUND)
    }
}

/// Which side is up and which export options are ticked.
///
/// The action button is only enabled while at least one option is ticked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    pub flipped: bool,
    pub pdf: bool,
    pub graphic: bool,
}

impl CardState {
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn set_pdf(&mut self, checked: bool) {
        self.pdf = checked;
    }

    pub fn set_graphic(&mut self, checked: bool) {
        self.graphic = checked;
    }

    pub fn explore_enabled(&self) -> bool {
        self.pdf || self.graphic
    }
}
