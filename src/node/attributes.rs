use crate::ecml::model::{FieldIssue, Media, coerce_bool, coerce_f64, value_kind};
use crate::foundation::core::Geometry;
use serde_json::{Map, Value};

/// Surface-side names that never belong to a node's public attribute view.
pub const SURFACE_KEYS: [&str; 4] = ["top", "left", "width", "height"];

const MANAGED_KEYS: [&str; 6] = ["id", "data", "config", "event", "events", "param"];

/// Live attributes of a node. Geometry is always in pixel space.
#[derive(Clone, Debug, PartialEq)]
pub struct Attributes {
    /// Pixel-space bounding box and rotation.
    pub geometry: Geometry,
    /// Visibility flag.
    pub visible: Option<bool>,
    /// Editability flag.
    pub editable: Option<bool>,
    /// Asset reference.
    pub asset: Option<String>,
    /// Inline media override for `asset`.
    pub asset_media: Option<Media>,
    /// Type-specific attributes.
    pub extra: Map<String, Value>,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            geometry: Geometry::zero(),
            visible: Some(true),
            editable: None,
            asset: None,
            asset_media: None,
            extra: Map::new(),
        }
    }
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

fn deep_merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (k, v) in patch {
                match target.get_mut(&k) {
                    Some(slot) => deep_merge(slot, v),
                    None => {
                        target.insert(k, v);
                    }
                }
            }
        }
        (slot, patch) => *slot = patch,
    }
}

impl Attributes {
    /// Read one attribute by its ECML name.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "x" | "y" | "w" | "h" | "rotate" => self.geometry.get(key).map(number),
            "visible" => self.visible.map(Value::Bool),
            "editable" => self.editable.map(Value::Bool),
            "asset" => self.asset.clone().map(Value::String),
            "assetMedia" => self
                .asset_media
                .as_ref()
                .and_then(|m| serde_json::to_value(m).ok()),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Write one attribute by its ECML name. `null` clears a documented attribute.
    ///
    /// Values of the wrong shape leave the attribute untouched and are reported back.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), FieldIssue> {
        if MANAGED_KEYS.contains(&key) {
            return Err(FieldIssue::ignored(
                key,
                "managed through the node API, not as an attribute",
            ));
        }
        match key {
            "x" | "y" | "w" | "h" | "rotate" => {
                let parsed = if value.is_null() {
                    None
                } else {
                    Some(coerce_f64(&value).ok_or_else(|| {
                        FieldIssue::ignored(
                            key,
                            format!("expected a finite number, found {}", value_kind(&value)),
                        )
                    })?)
                };
                if let Some(slot) = self.geometry.field_mut(key) {
                    *slot = parsed;
                }
            }
            "visible" | "editable" => {
                let parsed = if value.is_null() {
                    None
                } else {
                    Some(coerce_bool(&value).ok_or_else(|| {
                        FieldIssue::ignored(
                            key,
                            format!("expected a boolean, found {}", value_kind(&value)),
                        )
                    })?)
                };
                if key == "visible" {
                    self.visible = parsed;
                } else {
                    self.editable = parsed;
                }
            }
            "asset" => match value {
                Value::Null => self.asset = None,
                Value::String(s) => self.asset = Some(s),
                other => {
                    return Err(FieldIssue::ignored(
                        key,
                        format!("expected a string, found {}", value_kind(&other)),
                    ));
                }
            },
            "assetMedia" => {
                if value.is_null() {
                    self.asset_media = None;
                } else {
                    let media = serde_json::from_value::<Media>(value)
                        .map_err(|e| FieldIssue::ignored(key, e.to_string()))?;
                    self.asset_media = Some(media);
                }
            }
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Deep-merge a patch into the attributes.
    ///
    /// Documented attributes are replaced; nested objects under other keys are merged member by
    /// member.
    pub fn merge(&mut self, patch: Map<String, Value>) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        for (key, value) in patch {
            if is_documented(&key) {
                if let Err(issue) = self.set(&key, value) {
                    issues.push(issue);
                }
                continue;
            }
            match self.extra.get_mut(&key) {
                Some(slot) => deep_merge(slot, value),
                None => {
                    self.extra.insert(key, value);
                }
            }
        }
        issues
    }

    /// Every attribute as a JSON map, including surface-side keys.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for key in Geometry::FIELDS {
            if let Some(v) = self.geometry.get(key) {
                map.insert(key.to_string(), number(v));
            }
        }
        for key in ["visible", "editable", "asset", "assetMedia"] {
            if let Some(v) = self.get(key) {
                map.insert(key.to_string(), v);
            }
        }
        for (k, v) in &self.extra {
            map.insert(k.clone(), v.clone());
        }
        map
    }

    /// Public attribute view: [`Attributes::to_map`] without `top`, `left`, `width`, `height`.
    pub fn public_map(&self) -> Map<String, Value> {
        let mut map = self.to_map();
        for key in SURFACE_KEYS {
            map.remove(key);
        }
        map
    }
}

fn is_documented(key: &str) -> bool {
    matches!(
        key,
        "x" | "y" | "w" | "h" | "rotate" | "visible" | "editable" | "asset" | "assetMedia"
    ) || MANAGED_KEYS.contains(&key)
}

#[cfg(test)]
#[path = "../../tests/unit/node/attributes.rs"]
mod tests;
