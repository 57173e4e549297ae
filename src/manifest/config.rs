//! Configuration schema merging.

use crate::manifest::model::ConfigProperty;
use indexmap::IndexMap;
use serde_json::json;

/// Property name that is only offered for playable plugin types.
pub const AUTOPLAY: &str = "autoplay";

/// Instance-level schema every node starts with.
pub fn base_config_manifest() -> Vec<ConfigProperty> {
    vec![
        ConfigProperty::new("opacity", "slider")
            .with_title("Transparency")
            .with_default(json!(100)),
        ConfigProperty::new("strokeWidth", "rangeslider")
            .with_title("Border width")
            .with_default(json!(1)),
        ConfigProperty::new("stroke", "colorpicker")
            .with_title("Border color")
            .with_default(json!("rgba(255, 255, 255, 0)")),
        ConfigProperty::new(AUTOPLAY, "checkbox")
            .with_title("Autoplay")
            .with_default(json!(false)),
        ConfigProperty::new("visible", "checkbox")
            .with_title("Visible")
            .with_default(json!(true)),
    ]
}

/// Merge a type-level schema with an optional instance-level schema.
///
/// The result is unique by property name and keeps the type-level order. A same-named
/// instance-level descriptor replaces the type-level one in place; instance-only descriptors are
/// appended. Unless `playable` is set, `autoplay` is removed whichever side declared it.
pub fn merge_config_manifest(
    type_level: &[ConfigProperty],
    instance_level: Option<&[ConfigProperty]>,
    playable: bool,
) -> Vec<ConfigProperty> {
    let mut merged = IndexMap::<String, ConfigProperty>::new();
    for prop in type_level {
        merged
            .entry(prop.property_name.clone())
            .or_insert_with(|| prop.clone());
    }
    // Instance descriptors win over same-named type descriptors and keep the type's position.
    for prop in instance_level.unwrap_or_default() {
        merged.insert(prop.property_name.clone(), prop.clone());
    }
    if !playable {
        merged.shift_remove(AUTOPLAY);
    }
    merged.into_values().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/config.rs"]
mod tests;
