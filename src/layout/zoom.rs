use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 5.0;
/// Factor applied by the zoom-in/zoom-out buttons.
pub const ZOOM_STEP: f64 = 1.2;

/// Pan/zoom applied to the single group wrapping the packed circles.
/// Circle geometry itself is never rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Multiply the scale by `factor` keeping the screen point `focus` fixed.
    /// The resulting scale is clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn scale_by(&mut self, factor: f64, focus: (f64, f64)) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k = (self.k * factor).clamp(MIN_SCALE, MAX_SCALE);
        let (px, py) = focus;
        let (lx, ly) = self.invert(px, py);
        self.k = k;
        self.x = px - lx * k;
        self.y = py - ly * k;
    }

    pub fn zoom_in(&mut self, focus: (f64, f64)) {
        self.scale_by(ZOOM_STEP, focus);
    }

    pub fn zoom_out(&mut self, focus: (f64, f64)) {
        self.scale_by(1.0 / ZOOM_STEP, focus);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Layout coordinates → screen coordinates.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.k + self.x, y * self.k + self.y)
    }

    /// Screen coordinates → layout coordinates.
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.x) / self.k, (y - self.y) / self.k)
    }

    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        let mut t = ZoomTransform::IDENTITY;
        for _ in 0..30 {
            t.zoom_in((0.0, 0.0));
        }
        assert_eq!(t.k, MAX_SCALE);
        for _ in 0..30 {
            t.zoom_out((0.0, 0.0));
        }
        assert_eq!(t.k, MIN_SCALE);
    }

    #[test]
    fn test_focus_point_stays_put() {
        let mut t = ZoomTransform::IDENTITY;
        t.pan(30.0, -10.0);
        let before = t.invert(200.0, 150.0);
        t.scale_by(2.5, (200.0, 150.0));
        let after = t.invert(200.0, 150.0);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_apply_invert_agree() {
        let t = ZoomTransform { k: 2.0, x: 10.0, y: 5.0 };
        let (sx, sy) = t.apply(3.0, 4.0);
        assert_eq!((sx, sy), (16.0, 13.0));
        assert_eq!(t.invert(sx, sy), (3.0, 4.0));
    }

    #[test]
    fn test_bad_factor_ignored() {
        let mut t = ZoomTransform::IDENTITY;
        t.scale_by(0.0, (0.0, 0.0));
        t.scale_by(f64::NAN, (0.0, 0.0));
        assert_eq!(t, ZoomTransform::IDENTITY);
    }
}
