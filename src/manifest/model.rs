use crate::foundation::error::{EcmlError, EcmlResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Per-type plugin descriptor.
///
/// One manifest exists per plugin type; every node of that type receives its own clone, so node
/// code never mutates the type-level copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Plugin type identifier (e.g. `org.ekstep.shape`).
    pub id: String,
    /// Plugin version.
    #[serde(default, alias = "version")]
    pub ver: String,
    /// Short identifier used in ECML markup when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    /// Human readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Editor metadata.
    #[serde(default)]
    pub editor: EditorManifest,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Editor section of a [`Manifest`]. Every part is optional and degrades to a default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorManifest {
    /// Toolbar and context menu entries.
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    /// Sidebar entries (opaque to the core).
    #[serde(default)]
    pub sidebar_menu: Vec<Value>,
    /// Header entries (opaque to the core).
    #[serde(default)]
    pub header: Vec<Value>,
    /// Behaviour flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behaviour: Option<Behaviour>,
    /// Whether nodes of this type can play media (and so may offer `autoplay`).
    #[serde(default)]
    pub playable: bool,
    /// Type-level configuration schema.
    #[serde(default)]
    pub config_manifest: Vec<ConfigProperty>,
    /// Help resource, relative to the plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<HelpResource>,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A toolbar or context menu entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Menu identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `main` for the toolbar, `context` for the context menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Icon path, resolved against the plugin at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_image: Option<String>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub submenu: Vec<SubMenuItem>,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A nested menu entry; stamped with the owning plugin at registration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubMenuItem {
    /// Icon path, resolved against the plugin at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_image: Option<String>,
    /// Owning plugin type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_id: Option<String>,
    /// Owning plugin version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_ver: Option<String>,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Behaviour flags applied to the render object after instantiation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Behaviour {
    /// Show a rotation handle on the render object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotatable: Option<bool>,
    /// Keys this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Location of a plugin's help text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpResource {
    /// Path relative to the plugin.
    pub src: String,
    /// Resource type hint (e.g. `text`).
    #[serde(default = "default_help_data_type")]
    pub data_type: String,
}

fn default_help_data_type() -> String {
    "text".to_string()
}

/// One entry of a configuration schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigProperty {
    /// Config key this descriptor edits. Unique after merging.
    #[serde(alias = "name")]
    pub property_name: String,
    /// Value type (e.g. `slider`, `colorpicker`, `checkbox`).
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Label shown in the property panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Help text shown in the property panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value.
    #[serde(default, alias = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// UI hints this crate does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConfigProperty {
    /// Descriptor with only a property name and data type.
    pub fn new(property_name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            data_type: Some(data_type.into()),
            title: None,
            description: None,
            default_value: None,
            extra: Map::new(),
        }
    }

    /// Attach a label.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }
}

impl Manifest {
    /// Minimal manifest with just a type id.
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ver: String::new(),
            short_id: None,
            display_name: None,
            editor: EditorManifest::default(),
            extra: Map::new(),
        }
    }

    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> EcmlResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| EcmlError::validation(format!("parse plugin manifest JSON: {e}")))
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> EcmlResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            EcmlError::validation(format!("open plugin manifest '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Whether the type declares `behaviour.rotatable: true`.
    pub fn is_rotatable(&self) -> bool {
        self.editor
            .behaviour
            .as_ref()
            .and_then(|b| b.rotatable)
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/model.rs"]
mod tests;
