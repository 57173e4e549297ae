use crate::ecml::model::{FieldIssue, Media};
use crate::foundation::core::{Geometry, NodeId};
use crate::manifest::config::{base_config_manifest, merge_config_manifest};
use crate::manifest::model::{ConfigProperty, Manifest};
use crate::node::attributes::Attributes;
use crate::surface::backend::RenderHandle;
use crate::surface::props::to_surface_props;
use crate::transform::coords::to_percent;
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// Config values every instance starts with.
pub fn default_config() -> Map<String, Value> {
    let mut config = Map::new();
    config.insert("opacity".to_string(), json!(100));
    config.insert("strokeWidth".to_string(), json!(1));
    config.insert("stroke".to_string(), json!("rgba(255, 255, 255, 0)"));
    config.insert("autoplay".to_string(), json!(false));
    config.insert("visible".to_string(), json!(true));
    config
}

/// Per-instance state of a plugin node.
///
/// Attributes are held in pixel space; the ECML codec converts at the boundary. Parent and
/// children are referenced by id; lifetimes are owned by the session's instance registry.
#[derive(Clone, Debug)]
pub struct NodeState {
    id: NodeId,
    manifest: Manifest,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) attributes: Attributes,
    pub(crate) config: Option<Map<String, Value>>,
    pub(crate) data: Option<Value>,
    pub(crate) events: Option<Vec<Value>>,
    pub(crate) params: Option<IndexMap<String, Value>>,
    pub(crate) media: Option<IndexMap<String, Media>>,
    config_manifest: Option<Vec<ConfigProperty>>,
    render_handle: Option<RenderHandle>,
    pub(crate) dimensions: Option<Geometry>,
}

impl NodeState {
    /// Fresh instance state with default attributes and config.
    ///
    /// A random id is generated when `id` is `None`.
    pub fn new(manifest: Manifest, id: Option<NodeId>, parent: Option<NodeId>) -> Self {
        Self {
            id: id.unwrap_or_else(NodeId::generate),
            manifest,
            parent,
            children: Vec::new(),
            attributes: Attributes::default(),
            config: Some(default_config()),
            data: None,
            events: None,
            params: None,
            media: None,
            config_manifest: Some(base_config_manifest()),
            render_handle: None,
            dimensions: None,
        }
    }

    /// Node id.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// This node's copy of its type manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Plugin type (manifest id).
    pub fn get_type(&self) -> &str {
        &self.manifest.id
    }

    /// Plugin version.
    pub fn version(&self) -> &str {
        &self.manifest.ver
    }

    /// Short id when declared, else the manifest id.
    pub fn manifest_id(&self) -> &str {
        self.manifest.short_id.as_deref().unwrap_or(&self.manifest.id)
    }

    /// Display name when declared, else the manifest id.
    pub fn display_name(&self) -> &str {
        self.manifest
            .display_name
            .as_deref()
            .unwrap_or(&self.manifest.id)
    }

    /// Composing node, if any.
    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    /// Child ids in composition order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Append a child id; a child already present is not added twice.
    pub fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Drop a child id.
    pub fn remove_child(&mut self, child: &NodeId) {
        self.children.retain(|c| c != child);
    }

    /// Live (pixel-space) attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Mutable live attributes.
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Public attribute map, without surface-side keys.
    pub fn attribute_map(&self) -> Map<String, Value> {
        self.attributes.public_map()
    }

    /// Deep-merge attributes (pixel space).
    pub fn set_attributes(&mut self, patch: Map<String, Value>) -> Vec<FieldIssue> {
        self.attributes.merge(patch)
    }

    /// Set one attribute (pixel space).
    pub fn set_attribute(&mut self, key: &str, value: Value) -> Result<(), FieldIssue> {
        self.attributes.set(key, value)
    }

    /// Read one attribute.
    pub fn attribute(&self, key: &str) -> Option<Value> {
        self.attributes.get(key)
    }

    /// Replace the whole config.
    pub fn set_config(&mut self, config: Map<String, Value>) {
        self.config = Some(config);
    }

    /// Set one config value, creating the config if needed.
    pub fn add_config(&mut self, key: impl Into<String>, value: Value) {
        self.config
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
    }

    /// Current config.
    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.config.as_ref()
    }

    /// Replace the plugin data payload.
    pub fn set_data(&mut self, data: Value) {
        self.data = Some(data);
    }

    /// Plugin data payload.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Append a runtime event.
    pub fn add_event(&mut self, event: Value) {
        self.events.get_or_insert_with(Vec::new).push(event);
    }

    /// Runtime events.
    pub fn events(&self) -> Option<&[Value]> {
        self.events.as_deref()
    }

    /// Set a runtime param.
    pub fn add_param(&mut self, key: impl Into<String>, value: Value) {
        self.params
            .get_or_insert_with(IndexMap::new)
            .insert(key.into(), value);
    }

    /// Remove a runtime param, keeping the order of the others.
    pub fn delete_param(&mut self, key: &str) {
        if let Some(params) = self.params.as_mut() {
            params.shift_remove(key);
        }
    }

    /// Runtime params in insertion order.
    pub fn params(&self) -> Option<&IndexMap<String, Value>> {
        self.params.as_ref()
    }

    /// One runtime param.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref()?.get(key)
    }

    /// Declare a media asset this node needs bundled. Keyed by media id.
    pub fn add_media(&mut self, media: Media) {
        self.media
            .get_or_insert_with(IndexMap::new)
            .insert(media.id.clone(), media);
    }

    /// Declared media keyed by id.
    pub fn media(&self) -> Option<&IndexMap<String, Media>> {
        self.media.as_ref()
    }

    /// Replace the instance-level config schema.
    pub fn set_config_manifest(&mut self, schema: Option<Vec<ConfigProperty>>) {
        self.config_manifest = schema;
    }

    /// Merged config schema offered to property panels.
    pub fn config_manifest(&self) -> Vec<ConfigProperty> {
        merge_config_manifest(
            &self.manifest.editor.config_manifest,
            self.config_manifest.as_deref(),
            self.manifest.editor.playable,
        )
    }

    /// Render object backing this node.
    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.render_handle
    }

    /// Attach or detach the render object.
    pub fn set_render_handle(&mut self, handle: Option<RenderHandle>) {
        self.render_handle = handle;
    }

    /// Percent-space dimensions cached by the last surface sync.
    pub fn dimensions(&self) -> Option<Geometry> {
        self.dimensions
    }

    /// Percent-space bounding box and rotation.
    pub fn renderer_dimensions(&self) -> Geometry {
        to_percent(self.attributes.geometry)
    }

    /// Scalar attributes with geometry in percent space.
    pub fn properties(&self) -> Map<String, Value> {
        let percent = self.renderer_dimensions();
        let mut props = Map::new();
        for (key, value) in self.attributes.to_map() {
            if let Some(v) = percent.get(&key) {
                if let Some(n) = serde_json::Number::from_f64(v) {
                    props.insert(key, Value::Number(n));
                }
                continue;
            }
            if !(value.is_object() || value.is_array()) {
                props.insert(key, value);
            }
        }
        props
    }

    /// Attributes under surface property names.
    pub fn surface_props(&self) -> Map<String, Value> {
        to_surface_props(&self.attributes.to_map())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/state.rs"]
mod tests;
