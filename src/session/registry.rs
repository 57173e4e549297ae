//! Collaborators the editor core talks to: menus, media, plugin resources and editor events.

use crate::ecml::model::Media;
use crate::manifest::model::{Manifest, MenuItem};
use anyhow::Context;
use indexmap::IndexMap;
use serde_json::Value;
use std::path::PathBuf;

/// Looks up media descriptors for asset references found in ECML.
pub trait MediaResolver {
    /// Descriptor for `asset`, if known.
    fn resolve(&self, asset: &str) -> Option<Media>;
}

/// Media descriptors known to the session, keyed by media id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaRegistry {
    media: IndexMap<String, Media>,
}

impl MediaRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a descriptor.
    pub fn insert(&mut self, media: Media) {
        self.media.insert(media.id.clone(), media);
    }

    /// Descriptor by id.
    pub fn get(&self, id: &str) -> Option<&Media> {
        self.media.get(id)
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.media.len()
    }

    /// Whether no descriptor is registered.
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}

impl MediaResolver for MediaRegistry {
    fn resolve(&self, asset: &str) -> Option<Media> {
        self.media.get(asset).cloned()
    }
}

/// Resolves and loads files shipped with a plugin.
pub trait PluginResources {
    /// Location of `src` relative to the plugin.
    fn resolve_url(&self, manifest: &Manifest, src: &str) -> String;

    /// Load the text content of `src`.
    fn load(&self, manifest: &Manifest, src: &str) -> anyhow::Result<String>;
}

/// Plugin files laid out as `<root>/<id>-<ver>/<src>`.
#[derive(Clone, Debug)]
pub struct DirResources {
    root: PathBuf,
}

impl DirResources {
    /// Resources under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn plugin_dir(&self, manifest: &Manifest) -> PathBuf {
        self.root.join(format!("{}-{}", manifest.id, manifest.ver))
    }
}

impl Default for DirResources {
    fn default() -> Self {
        Self::new("plugins")
    }
}

impl PluginResources for DirResources {
    fn resolve_url(&self, manifest: &Manifest, src: &str) -> String {
        self.plugin_dir(manifest).join(src).to_string_lossy().into_owned()
    }

    fn load(&self, manifest: &Manifest, src: &str) -> anyhow::Result<String> {
        let path = self.plugin_dir(manifest).join(src);
        std::fs::read_to_string(&path)
            .with_context(|| format!("read plugin resource '{}'", path.display()))
    }
}

/// Menu registrations collected from plugin manifests.
///
/// The menus themselves are drawn elsewhere; this only records what each type contributed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuRegistry {
    /// `main` category entries.
    pub toolbar: Vec<MenuItem>,
    /// `context` category entries.
    pub context: Vec<MenuItem>,
    /// Sidebar entries with the owning plugin type.
    pub sidebar: Vec<(String, Value)>,
    /// Header entries with the owning plugin type.
    pub header: Vec<(String, Value)>,
    /// Custom sidebar templates keyed by plugin type.
    pub templates: IndexMap<String, String>,
}

/// Sidebar template a plugin may ship next to its manifest.
pub const SIDEBAR_TEMPLATE: &str = "editor/sidebar.html";

impl MenuRegistry {
    /// Record every menu contribution of `manifest`.
    ///
    /// Icon paths are resolved against the plugin and submenu entries are stamped with the
    /// plugin id and version, both in place, so the caller keeps the registered form.
    pub fn register(&mut self, manifest: &mut Manifest, resources: &dyn PluginResources) {
        let owner = manifest.clone();
        for item in &mut manifest.editor.menu {
            if let Some(icon) = item.icon_image.as_deref() {
                item.icon_image = Some(resources.resolve_url(&owner, icon));
            }
            for sub in &mut item.submenu {
                if let Some(icon) = sub.icon_image.as_deref() {
                    sub.icon_image = Some(resources.resolve_url(&owner, icon));
                }
                sub.plugin_id = Some(owner.id.clone());
                sub.plugin_ver = Some(owner.ver.clone());
            }
            match item.category.as_deref() {
                Some("main") => self.toolbar.push(item.clone()),
                Some("context") => self.context.push(item.clone()),
                other => {
                    tracing::debug!(plugin = %owner.id, category = ?other, "menu entry not registered")
                }
            }
        }

        for entry in &manifest.editor.sidebar_menu {
            self.sidebar.push((owner.id.clone(), entry.clone()));
        }
        match resources.load(&owner, SIDEBAR_TEMPLATE) {
            Ok(template) => {
                self.templates.insert(owner.id.clone(), template);
            }
            Err(e) => tracing::debug!(plugin = %owner.id, "no custom sidebar template: {e:#}"),
        }
        for entry in &manifest.editor.header {
            self.header.push((owner.id.clone(), entry.clone()));
        }
    }
}

/// A named editor-wide notification.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorEvent {
    /// Event name, e.g. `object:modified`.
    pub name: String,
    /// Event payload.
    pub payload: Value,
}

impl EditorEvent {
    /// Event `name` carrying `payload`.
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Callback registered for an editor event.
pub type EventListener = Box<dyn FnMut(&EditorEvent)>;

#[cfg(test)]
#[path = "../../tests/unit/session/registry.rs"]
mod tests;
