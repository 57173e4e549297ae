use std::fmt;

/// Width of the virtual editing canvas in pixels.
pub const CANVAS_WIDTH: f64 = 720.0;
/// Height of the virtual editing canvas in pixels.
pub const CANVAS_HEIGHT: f64 = 405.0;

/// Identifier of a plugin node. Immutable once assigned and the only key used for registry
/// lookups.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing identifier (usually taken from persisted ECML).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Bounding box and rotation of a node.
///
/// The same record is used for both coordinate spaces; which space a value is in is decided by
/// its owner (`Attributes` is pixel space, `EcmlNode` is percent space). Absent fields stay
/// absent through conversions.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Geometry {
    /// Left edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Top edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    /// Height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

impl Geometry {
    /// Geometry with every box field set to zero and no rotation.
    pub fn zero() -> Self {
        Self {
            x: Some(0.0),
            y: Some(0.0),
            w: Some(0.0),
            h: Some(0.0),
            rotate: None,
        }
    }

    /// Geometry with all five fields set.
    pub fn new(x: f64, y: f64, w: f64, h: f64, rotate: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            w: Some(w),
            h: Some(h),
            rotate: Some(rotate),
        }
    }

    /// Read a field by its ECML name.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "x" => self.x,
            "y" => self.y,
            "w" => self.w,
            "h" => self.h,
            "rotate" => self.rotate,
            _ => None,
        }
    }

    /// Mutable access to a field by its ECML name.
    pub fn field_mut(&mut self, key: &str) -> Option<&mut Option<f64>> {
        match key {
            "x" => Some(&mut self.x),
            "y" => Some(&mut self.y),
            "w" => Some(&mut self.w),
            "h" => Some(&mut self.h),
            "rotate" => Some(&mut self.rotate),
            _ => None,
        }
    }

    /// ECML field names of the geometry record, in output order.
    pub const FIELDS: [&'static str; 5] = ["x", "y", "w", "h", "rotate"];
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
