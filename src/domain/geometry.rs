//! Partition geometry: arcs, focus windows and visibility rules

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

/// Angular span `[x0, x1]` (radians) and depth span `[y0, y1]` (levels) of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Arc {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Arc {
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    pub fn angle_span(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn depth_span(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Angle-by-depth product used for label decluttering.
    pub fn area(&self) -> f64 {
        self.angle_span() * self.depth_span()
    }

    /// Middle angle in radians.
    pub fn mid_angle(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn mid_depth(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    /// Express `self` relative to `focus`, whose depth is `focus_depth`.
    ///
    /// The focus span is stretched to the full circle and the focus depth
    /// becomes zero. Angles are clamped to `[0, 2π]` and depths to `>= 0`, so
    /// arcs outside the focused subtree collapse to a zero-width span.
    pub fn remap(&self, focus: &Arc, focus_depth: f64) -> Arc {
        let span = focus.angle_span();
        let unit = |x: f64| {
            if span > 0.0 {
                ((x - focus.x0) / span).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        Arc {
            x0: unit(self.x0) * TAU,
            x1: unit(self.x1) * TAU,
            y0: (self.y0 - focus_depth).max(0.0),
            y1: (self.y1 - focus_depth).max(0.0),
        }
    }

    /// Linear interpolation towards `target`, `t` in `[0, 1]`.
    pub fn lerp(&self, target: &Arc, t: f64) -> Arc {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Arc {
            x0: mix(self.x0, target.x0),
            x1: mix(self.x1, target.x1),
            y0: mix(self.y0, target.y0),
            y1: mix(self.y1, target.y1),
        }
    }
}

/// Visible slice of the tree relative to the focused node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusWindow {
    pub angle_start: f64,
    pub angle_end: f64,
    pub depth_start: f64,
    pub depth_end: f64,
}

impl FocusWindow {
    /// Full circle over `levels` depth units.
    ///
    /// Depth is counted in partition units, so a tree of edge height `h`
    /// spans `h + 1` of them with the hub in `[0, 1]`.
    pub fn full(levels: usize) -> Self {
        Self {
            angle_start: 0.0,
            angle_end: TAU,
            depth_start: 0.0,
            depth_end: levels as f64,
        }
    }
}

/// Depth band and label threshold deciding what gets drawn.
///
/// Defaults: six concentric rings starting at depth 1, and labels only for
/// arcs whose angle-by-depth area exceeds 0.03.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityRules {
    pub min_depth: f64,
    pub max_depth: f64,
    pub label_min_area: f64,
}

impl Default for VisibilityRules {
    fn default() -> Self {
        Self {
            min_depth: 1.0,
            max_depth: 6.0,
            label_min_area: 0.03,
        }
    }
}

impl VisibilityRules {
    fn in_band(&self, arc: &Arc) -> bool {
        arc.y0 >= self.min_depth && arc.y1 <= self.max_depth
    }

    pub fn arc_visible(&self, arc: &Arc) -> bool {
        self.in_band(arc) && arc.x1 > arc.x0
    }

    pub fn label_visible(&self, arc: &Arc) -> bool {
        self.in_band(arc) && arc.area() > self.label_min_area
    }
}
