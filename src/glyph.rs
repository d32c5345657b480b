// src/glyph.rs

//! Signed distance to the glyph outline.
//!
//! The glyph is two rounded staples: one upright, one rotated by 180° about
//! the origin, sharing a stem. Distances are measured in stroke units (one
//! unit is one stroke width). Values are negative inside the stroke, zero on
//! its outer contour and positive outside.
//!
//! [`GlyphFrame`] maps the index coordinates of the regular domain into this
//! frame so the trimmer can use the distance directly as its level set.

// --- Staple geometry (stroke units) ---
const ARCH_RADIUS: f64 = 1.0; // centerline radius of the arch and the feet
const LEG_HALF_LENGTH: f64 = 1.5; // half the length of the straight legs
const HALF_STROKE: f64 = 0.5; // inset from centerline to outer contour
const STAPLE_ANCHOR: (f64, f64) = (-1.0, 1.0); // midpoint between the upright staple's legs

/// Signed distance from `(x, y)` to the glyph contour.
///
/// Symmetric under a half turn: `distance(x, y) == distance(-x, -y)`.
pub fn distance(x: f64, y: f64) -> f64 {
    staple_distance(x, y).min(staple_distance(-x, -y))
}

/// Signed distance to the upright staple alone.
///
/// The point is reflected into the canonical half plane about the staple's
/// axis and classified into one of three bands: the arch above the arc
/// center, the straight leg, or the foot below it.
pub(crate) fn staple_distance(x: f64, y: f64) -> f64 {
    let px = (x - STAPLE_ANCHOR.0).abs();
    let py = y - STAPLE_ANCHOR.1;

    let centerline = if py > LEG_HALF_LENGTH {
        ring_distance(px, py - LEG_HALF_LENGTH, ARCH_RADIUS)
    } else if py >= -LEG_HALF_LENGTH {
        (px - ARCH_RADIUS).abs()
    } else {
        // The foot curls outward: the arch ring reflected through the leg end.
        let fx = px - 2.0 * ARCH_RADIUS;
        let fy = py + LEG_HALF_LENGTH;
        if fx <= 0.0 {
            ring_distance(fx, fy, ARCH_RADIUS)
        } else {
            fx.hypot(fy + ARCH_RADIUS)
        }
    };

    centerline - HALF_STROKE
}

/// Unsigned distance from `(dx, dy)` to a circle of `radius` around the origin.
fn ring_distance(dx: f64, dy: f64, radius: f64) -> f64 {
    (dx.hypot(dy) - radius).abs()
}

/// Affine map from domain index space `[0, N]²` into the glyph frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphFrame {
    resolution: f64,
    stroke_width: f64,
}

impl GlyphFrame {
    /// `stroke_width` cells make one stroke unit; the domain center lands on
    /// the glyph origin.
    pub fn new(resolution: u32, stroke_width: u32) -> Self {
        GlyphFrame {
            resolution: f64::from(resolution),
            stroke_width: f64::from(stroke_width),
        }
    }

    /// Converts index coordinates to glyph coordinates.
    pub fn to_glyph(&self, x: f64, y: f64) -> (f64, f64) {
        let half = 0.5 * self.resolution;
        ((x - half) / self.stroke_width, (y - half) / self.stroke_width)
    }

    /// Glyph distance at an index-space point, in stroke units.
    pub fn distance_at(&self, x: f64, y: f64) -> f64 {
        let (gx, gy) = self.to_glyph(x, y);
        distance(gx, gy)
    }
}

#[cfg(test)]
mod tests;
