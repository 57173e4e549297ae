//! Mapping from ECML attribute names to surface property names.

use crate::foundation::core::Geometry;
use crate::surface::backend::ObjectBounds;
use crate::transform::coords::pixel_rect;
use serde_json::{Map, Value};

const RENAMES: [(&str, &str); 7] = [
    ("x", "left"),
    ("y", "top"),
    ("w", "width"),
    ("h", "height"),
    ("radius", "rx"),
    ("color", "fill"),
    ("rotate", "angle"),
];

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Copy `data` and add the surface names for the ECML keys it carries.
///
/// Zero, empty and `false` values do not produce a surface key; the surface default applies.
pub fn to_surface_props(data: &Map<String, Value>) -> Map<String, Value> {
    let mut out = data.clone();
    for (ecml, surface) in RENAMES {
        if let Some(v) = data.get(ecml)
            && is_truthy(v)
        {
            out.insert(surface.to_string(), v.clone());
        }
    }
    out
}

/// Surface bounds for a pixel-space geometry.
pub fn bounds_from_geometry(g: &Geometry) -> ObjectBounds {
    ObjectBounds {
        rect: pixel_rect(g),
        angle: g.rotate.unwrap_or(0.0),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/props.rs"]
mod tests;
