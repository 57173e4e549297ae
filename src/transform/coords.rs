//! Conversions between the 720x405 virtual pixel canvas and percent space.
//!
//! Percent values are the durable representation and are rounded to two decimals on the way
//! out. Pixel values are render-time quantities and are never re-rounded.

use crate::foundation::core::{CANVAS_HEIGHT, CANVAS_WIDTH, Geometry};
use kurbo::Rect;

#[inline]
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Convert a pixel-space geometry to percent space in place.
///
/// `x`/`w` are relative to the canvas width and `y`/`h` to its height. `rotate` is passed
/// through unchanged.
pub fn pixel_to_percent(g: &mut Geometry) {
    g.x = g.x.map(|v| round2(v / CANVAS_WIDTH * 100.0));
    g.y = g.y.map(|v| round2(v / CANVAS_HEIGHT * 100.0));
    g.w = g.w.map(|v| round2(v / CANVAS_WIDTH * 100.0));
    g.h = g.h.map(|v| round2(v / CANVAS_HEIGHT * 100.0));
}

/// Convert a percent-space geometry to pixel space in place. No rounding is applied.
pub fn percent_to_pixel(g: &mut Geometry) {
    g.x = g.x.map(|v| v * (CANVAS_WIDTH / 100.0));
    g.y = g.y.map(|v| v * (CANVAS_HEIGHT / 100.0));
    g.w = g.w.map(|v| v * (CANVAS_WIDTH / 100.0));
    g.h = g.h.map(|v| v * (CANVAS_HEIGHT / 100.0));
}

/// Percent-space copy of a pixel-space geometry.
pub fn to_percent(mut g: Geometry) -> Geometry {
    pixel_to_percent(&mut g);
    g
}

/// Pixel rectangle described by a pixel-space geometry. Absent fields count as zero.
pub fn pixel_rect(g: &Geometry) -> Rect {
    let x = g.x.unwrap_or(0.0);
    let y = g.y.unwrap_or(0.0);
    Rect::new(x, y, x + g.w.unwrap_or(0.0), y + g.h.unwrap_or(0.0))
}

/// Pixel-space geometry for a rectangle and a rotation angle in degrees.
pub fn geometry_from_rect(rect: Rect, angle: f64) -> Geometry {
    let rect = rect.abs();
    Geometry::new(rect.x0, rect.y0, rect.width(), rect.height(), angle)
}

#[cfg(test)]
#[path = "../../tests/unit/transform/coords.rs"]
mod tests;
