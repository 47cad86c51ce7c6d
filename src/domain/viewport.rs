//! Rotation and zoom state of a diagram, owned by the presentation context

use serde::{Deserialize, Serialize};

use crate::domain::geometry::Arc;

/// Step sizes and limits for spinning and zooming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportLimits {
    /// Degrees per spin step
    pub rotation_step: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            rotation_step: 30.0,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            min_scale: 0.5,
            max_scale: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Accumulated rotation in degrees, unbounded
    pub rotation_deg: f64,
    pub scale: f64,
    limits: ViewportLimits,
}

impl Viewport {
    pub fn new(limits: ViewportLimits) -> Self {
        Self {
            rotation_deg: 0.0,
            scale: 1.0,
            limits,
        }
    }

    pub fn spin_left(&mut self) {
        self.rotation_deg -= self.limits.rotation_step;
    }

    pub fn spin_right(&mut self) {
        self.rotation_deg += self.limits.rotation_step;
    }

    pub fn reset_rotation(&mut self) {
        self.rotation_deg = 0.0;
    }

    pub fn zoom_in(&mut self) {
        self.scale_by(self.limits.zoom_in_factor);
    }

    pub fn zoom_out(&mut self) {
        self.scale_by(self.limits.zoom_out_factor);
    }

    pub fn reset_zoom(&mut self) {
        self.scale = 1.0;
    }

    fn scale_by(&mut self, factor: f64) {
        self.scale = (self.scale * factor).clamp(self.limits.min_scale, self.limits.max_scale);
    }

    /// Rotation applied to the hub text so it stays level.
    pub fn hub_counter_rotation(&self) -> f64 {
        -self.rotation_deg
    }

    pub fn label_placement(&self, arc: &Arc, radius: f64) -> LabelPlacement {
        LabelPlacement::for_arc(arc, self.rotation_deg, radius)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportLimits::default())
    }
}

/// Transform of a sunburst label: `rotate(rotate_deg) translate(radius_offset, 0) rotate(flip_deg)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub rotate_deg: f64,
    pub radius_offset: f64,
    pub flip_deg: f64,
}

impl LabelPlacement {
    /// Labels on the visual left half are flipped so text stays upright,
    /// taking the diagram's current rotation into account.
    pub fn for_arc(arc: &Arc, rotation_deg: f64, radius: f64) -> Self {
        let mid_deg = arc.mid_angle().to_degrees();
        let absolute = (mid_deg + rotation_deg).rem_euclid(360.0);
        let flip_deg = if absolute > 180.0 && absolute < 360.0 {
            180.0
        } else {
            0.0
        };
        Self {
            rotate_deg: mid_deg - 90.0,
            radius_offset: arc.mid_depth() * radius,
            flip_deg,
        }
    }

    pub fn to_svg_transform(&self) -> String {
        format!(
            "rotate({}) translate({},0) rotate({})",
            self.rotate_deg, self.radius_offset, self.flip_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn given_spins_when_resetting_then_rotation_zero() {
        let mut vp = Viewport::default();

        vp.spin_right();
        vp.spin_right();
        vp.spin_left();
        assert_eq!(vp.rotation_deg, 30.0);
        assert_eq!(vp.hub_counter_rotation(), -30.0);

        vp.reset_rotation();
        assert_eq!(vp.rotation_deg, 0.0);
    }

    #[test]
    fn given_repeated_zoom_when_scaling_then_clamped() {
        let mut vp = Viewport::default();

        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.scale, 4.0);

        for _ in 0..20 {
            vp.zoom_out();
        }
        assert_eq!(vp.scale, 0.5);

        vp.reset_zoom();
        assert_eq!(vp.scale, 1.0);
    }

    #[test]
    fn given_left_half_arc_when_placing_label_then_flipped() {
        // centred at 270 degrees
        let arc = Arc::new(1.4 * PI, 1.6 * PI, 1.0, 2.0);

        let placement = LabelPlacement::for_arc(&arc, 0.0, 150.0);

        assert_eq!(placement.flip_deg, 180.0);
        assert_eq!(placement.radius_offset, 225.0);
    }

    #[test]
    fn given_rotation_when_placing_label_then_flip_follows_absolute_angle() {
        // centred at 90 degrees; rotating by 120 moves it to 210
        let arc = Arc::new(0.4 * PI, 0.6 * PI, 1.0, 2.0);

        assert_eq!(LabelPlacement::for_arc(&arc, 0.0, 1.0).flip_deg, 0.0);
        assert_eq!(LabelPlacement::for_arc(&arc, 120.0, 1.0).flip_deg, 180.0);
        assert_eq!(LabelPlacement::for_arc(&arc, -60.0, 1.0).flip_deg, 0.0);
        assert_eq!(LabelPlacement::for_arc(&arc, -120.0, 1.0).flip_deg, 180.0);
    }
}
