use crate::ecml::model::{EcmlNode, FieldIssue, coerce_bool, coerce_f64};
use crate::foundation::core::NodeId;
use crate::foundation::error::{EcmlError, EcmlResult};
use crate::manifest::model::{ConfigProperty, Manifest};
use crate::node::plugin::{BlankPlugin, Plugin, PluginFactory, PluginNode};
use crate::node::state::NodeState;
use crate::session::registry::{
    DirResources, EditorEvent, EventListener, MediaRegistry, MenuRegistry, PluginResources,
};
use crate::surface::backend::{RenderSurface, SurfaceEventKind};
use crate::surface::scene::SceneSurface;
use crate::transform::coords::{geometry_from_rect, to_percent};
use indexmap::IndexMap;
use serde_json::{Value, json};
use std::collections::HashMap;

/// Type id of the root container nodes.
pub const STAGE_TYPE: &str = "stage";

/// Editor-wide notification emitted after a node changed.
pub const OBJECT_MODIFIED: &str = "object:modified";

/// Help text returned when a plugin's help resource cannot be loaded.
pub const HELP_FALLBACK: &str = "Help is not available.";

/// Session-wide options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionOpts {
    /// Reject ECML trees with parse or hydration issues instead of tolerating them.
    pub strict_ecml: bool,
}

struct PluginType {
    manifest: Manifest,
    factory: PluginFactory,
    prototype: Box<dyn Plugin>,
}

/// An editing session: registered plugin types, live nodes and the surface they render on.
///
/// The session owns every node; parents and children refer to each other by id only.
pub struct EditorSession<S: RenderSurface = SceneSurface> {
    pub(crate) instances: HashMap<NodeId, PluginNode>,
    types: IndexMap<String, PluginType>,
    pub(crate) surface: S,
    menus: MenuRegistry,
    media: MediaRegistry,
    resources: Box<dyn PluginResources>,
    listeners: IndexMap<String, Vec<EventListener>>,
    create_events: HashMap<String, String>,
    current_stage: Option<NodeId>,
    opts: SessionOpts,
}

impl EditorSession<SceneSurface> {
    /// Headless session on an in-memory surface.
    pub fn headless(opts: SessionOpts) -> Self {
        Self::new(SceneSurface::new(), opts)
    }
}

impl<S: RenderSurface> EditorSession<S> {
    /// Session drawing on `surface`, loading plugin files from the default `plugins` root.
    pub fn new(surface: S, opts: SessionOpts) -> Self {
        Self {
            instances: HashMap::new(),
            types: IndexMap::new(),
            surface,
            menus: MenuRegistry::default(),
            media: MediaRegistry::new(),
            resources: Box::new(DirResources::default()),
            listeners: IndexMap::new(),
            create_events: HashMap::new(),
            current_stage: None,
            opts,
        }
    }

    /// Replace the plugin resource loader.
    pub fn with_resources(mut self, resources: impl PluginResources + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    /// Options the session was built with.
    pub fn opts(&self) -> SessionOpts {
        self.opts
    }

    /// Render surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable render surface, e.g. to simulate user interaction.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Menu entries contributed by registered types.
    pub fn menus(&self) -> &MenuRegistry {
        &self.menus
    }

    /// Media descriptors used to resolve node assets.
    pub fn media(&self) -> &MediaRegistry {
        &self.media
    }

    /// Mutable media registry.
    pub fn media_mut(&mut self) -> &mut MediaRegistry {
        &mut self.media
    }

    /// Live node by id.
    pub fn node(&self, id: &NodeId) -> Option<&PluginNode> {
        self.instances.get(id)
    }

    /// Mutable live node by id.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut PluginNode> {
        self.instances.get_mut(id)
    }

    /// Whether `id` names a live node.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.instances.contains_key(id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no node is live.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Registered manifest of a plugin type.
    pub fn manifest(&self, type_id: &str) -> Option<&Manifest> {
        self.types.get(type_id).map(|t| &t.manifest)
    }

    /// Initialized prototype behavior of a plugin type.
    pub fn prototype(&self, type_id: &str) -> Option<&dyn Plugin> {
        self.types.get(type_id).map(|t| t.prototype.as_ref())
    }

    /// Stage that create events instantiate into.
    pub fn current_stage(&self) -> Option<&NodeId> {
        self.current_stage.as_ref()
    }

    fn lookup(&self, id: &NodeId) -> EcmlResult<&PluginNode> {
        self.instances
            .get(id)
            .ok_or_else(|| EcmlError::registry(format!("unknown node '{id}'")))
    }

    fn lookup_mut(&mut self, id: &NodeId) -> EcmlResult<&mut PluginNode> {
        self.instances
            .get_mut(id)
            .ok_or_else(|| EcmlError::registry(format!("unknown node '{id}'")))
    }

    /// Register a plugin type.
    ///
    /// Menus are recorded, a prototype behavior is built and initialized, and the type starts
    /// listening for `<id>:create`.
    #[tracing::instrument(skip_all, fields(plugin = %manifest.id))]
    pub fn register_type(
        &mut self,
        mut manifest: Manifest,
        factory: impl Fn() -> Box<dyn Plugin> + 'static,
    ) -> EcmlResult<()> {
        if self.types.contains_key(&manifest.id) {
            return Err(EcmlError::registry(format!(
                "plugin type '{}' is already registered",
                manifest.id
            )));
        }
        self.menus.register(&mut manifest, self.resources.as_ref());

        let mut prototype = factory();
        prototype.initialize(&manifest);

        self.create_events
            .insert(format!("{}:create", manifest.id), manifest.id.clone());
        tracing::debug!("registered plugin type");
        self.types.insert(
            manifest.id.clone(),
            PluginType {
                manifest,
                factory: Box::new(factory),
                prototype,
            },
        );
        Ok(())
    }

    /// Create a stage node and make it current. New nodes created through `<id>:create` land
    /// on the current stage.
    pub fn add_stage(&mut self, tree: Option<EcmlNode>) -> EcmlResult<NodeId> {
        if !self.types.contains_key(STAGE_TYPE) {
            self.register_type(Manifest::named(STAGE_TYPE), || Box::new(BlankPlugin))?;
        }
        let id = self.instantiate(STAGE_TYPE, tree, None)?;
        self.current_stage = Some(id.clone());
        Ok(id)
    }

    /// Instantiate from a raw ECML value, honoring [`SessionOpts::strict_ecml`].
    pub fn instantiate_value(
        &mut self,
        type_id: &str,
        tree: Value,
        parent: Option<&NodeId>,
    ) -> EcmlResult<NodeId> {
        let parsed = EcmlNode::parse(tree);
        let tree = if self.opts.strict_ecml {
            parsed.into_strict()?
        } else {
            for issue in &parsed.issues {
                tracing::warn!(plugin = type_id, %issue, "tolerated ECML issue");
            }
            parsed.value
        };
        self.instantiate(type_id, Some(tree), parent)
    }

    /// Build a live node of `type_id`.
    ///
    /// Runs hydration from `tree`, then [`Plugin::new_instance`], then the post-init steps:
    /// surface subscriptions, id stamping, forced visibility, the rotatable flag, registration,
    /// attachment to `parent` and, unless the parent is a stage, an `object:modified`
    /// notification.
    #[tracing::instrument(skip(self, tree))]
    pub fn instantiate(
        &mut self,
        type_id: &str,
        tree: Option<EcmlNode>,
        parent: Option<&NodeId>,
    ) -> EcmlResult<NodeId> {
        let ty = self
            .types
            .get(type_id)
            .ok_or_else(|| EcmlError::registry(format!("unknown plugin type '{type_id}'")))?;
        if let Some(parent) = parent
            && !self.instances.contains_key(parent)
        {
            return Err(EcmlError::registry(format!("unknown parent node '{parent}'")));
        }

        let id = tree.as_ref().and_then(|t| t.id.clone()).map(NodeId::new);
        if let Some(id) = &id
            && self.instances.contains_key(id)
        {
            return Err(EcmlError::registry(format!("node '{id}' already exists")));
        }

        let mut state = NodeState::new(ty.manifest.clone(), id, parent.cloned());
        if let Some(tree) = tree {
            let issues = state.from_ecml(tree, &self.media);
            if self.opts.strict_ecml && !issues.is_empty() {
                return Err(hydration_error(&issues));
            }
        }

        let mut plugin = (ty.factory)();
        plugin.new_instance(&mut state, &mut self.surface);

        if let Some(handle) = state.render_handle() {
            self.surface.subscribe(handle, &SurfaceEventKind::ALL);
            self.surface.set_object_id(handle, state.id());
            self.surface.set_visible(handle, true);
            if state.manifest().is_rotatable() {
                self.surface.set_rotatable(handle, true);
            }
        }

        let id = state.id().clone();
        self.instances
            .insert(id.clone(), PluginNode::new(state, plugin));
        tracing::debug!(node = %id, "instantiated");

        if let Some(parent) = parent
            && let Some(parent_node) = self.instances.get_mut(parent)
        {
            parent_node.state.add_child(id.clone());
            if parent_node.state.get_type() != STAGE_TYPE {
                self.dispatch_event(OBJECT_MODIFIED, json!({ "id": id.as_str() }))?;
            }
        }
        Ok(id)
    }

    /// Detach a node from its parent and drop it from the registry.
    ///
    /// The render object is left to the caller. Children stay registered with their parent
    /// link cleared.
    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, id: &NodeId) -> Option<PluginNode> {
        let mut node = self.instances.remove(id)?;
        if let Some(parent) = node.state.parent.take()
            && let Some(parent_node) = self.instances.get_mut(&parent)
        {
            parent_node.state.remove_child(id);
        }
        for child in std::mem::take(&mut node.state.children) {
            if let Some(child_node) = self.instances.get_mut(&child) {
                tracing::warn!(child = %child, "orphaned child of removed node");
                child_node.state.parent = None;
            }
        }
        if self.current_stage.as_ref() == Some(id) {
            self.current_stage = None;
        }
        Some(node)
    }

    /// Listen for an editor event.
    pub fn add_event_listener(&mut self, name: impl Into<String>, listener: EventListener) {
        self.listeners.entry(name.into()).or_default().push(listener);
    }

    /// Notify listeners of `name`. A `<type>:create` event also instantiates that type on the
    /// current stage, using the payload as its ECML tree.
    pub fn dispatch_event(&mut self, name: &str, payload: Value) -> EcmlResult<()> {
        let event = EditorEvent::new(name, payload);
        if let Some(listeners) = self.listeners.get_mut(name) {
            for listener in listeners.iter_mut() {
                listener(&event);
            }
        }
        if let Some(type_id) = self.create_events.get(name).cloned() {
            let stage = self.current_stage.clone();
            self.instantiate_value(&type_id, event.payload, stage.as_ref())?;
        }
        Ok(())
    }

    /// Pull the render object's pixel bounds into the node and cache its percent dimensions.
    pub fn update_plugin_dimensions(&mut self, id: &NodeId) -> EcmlResult<()> {
        let node = self
            .instances
            .get_mut(id)
            .ok_or_else(|| EcmlError::registry(format!("unknown node '{id}'")))?;
        let Some(bounds) = node
            .state
            .render_handle()
            .and_then(|h| self.surface.bounds(h))
        else {
            return Ok(());
        };
        let geometry = geometry_from_rect(bounds.rect, bounds.angle);
        node.state.attributes.geometry = geometry;
        node.state.dimensions = Some(to_percent(geometry));
        Ok(())
    }

    /// Full ECML of a node after syncing its geometry from the surface.
    pub fn to_ecml(&mut self, id: &NodeId) -> EcmlResult<EcmlNode> {
        self.update_plugin_dimensions(id)?;
        Ok(self.lookup(id)?.to_ecml())
    }

    /// Copy of a node as ECML, ready to be instantiated again.
    pub fn copy_ecml(&mut self, id: &NodeId) -> EcmlResult<EcmlNode> {
        self.to_ecml(id)
    }

    /// Put a node on the surface through its [`Plugin::render`].
    pub fn render(&mut self, id: &NodeId) -> EcmlResult<()> {
        let node = self
            .instances
            .get_mut(id)
            .ok_or_else(|| EcmlError::registry(format!("unknown node '{id}'")))?;
        node.plugin.render(&node.state, &mut self.surface);
        Ok(())
    }

    /// Let a node adjust the context menu, e.g. on selection.
    pub fn update_context_menu(&mut self, id: &NodeId) -> EcmlResult<()> {
        let node = self
            .instances
            .get_mut(id)
            .ok_or_else(|| EcmlError::registry(format!("unknown node '{id}'")))?;
        node.plugin.update_context_menu(&node.state, &mut self.menus);
        Ok(())
    }

    /// Let the node's plugin re-apply its config.
    pub fn re_config(&mut self, id: &NodeId) -> EcmlResult<()> {
        let PluginNode { state, plugin } = self.lookup_mut(id)?;
        plugin.re_config(state);
        Ok(())
    }

    /// Merged config schema of a node.
    pub fn config_manifest(&self, id: &NodeId) -> EcmlResult<Vec<ConfigProperty>> {
        Ok(self.lookup(id)?.state.config_manifest())
    }

    /// Apply a property panel change.
    ///
    /// The value is stored in the config. The base properties `opacity`, `strokeWidth`,
    /// `stroke`, `autoplay` and `visible` are mirrored into attributes and onto the render
    /// object. The node's own [`Plugin::on_config_change`] runs next, then the node is
    /// re-rendered and `object:modified` is dispatched.
    #[tracing::instrument(skip(self, value))]
    pub fn on_config_change(&mut self, id: &NodeId, key: &str, value: Value) -> EcmlResult<()> {
        let node = self
            .instances
            .get_mut(id)
            .ok_or_else(|| EcmlError::registry(format!("unknown node '{id}'")))?;
        let state = &mut node.state;
        let handle = state.render_handle();
        let mut value = value;

        match key {
            "opacity" => {
                let ratio = coerce_f64(&value).map(|v| v / 100.0);
                if let Some(ratio) = ratio {
                    if let Some(h) = handle {
                        self.surface.set_style(h, "opacity", json!(ratio));
                    }
                    state.attributes.extra.insert("opacity".to_string(), json!(ratio));
                }
            }
            "strokeWidth" => {
                if let Some(width) = coerce_f64(&value).map(|v| v.trunc() as i64) {
                    value = json!(width);
                    if let Some(h) = handle {
                        self.surface.set_style(h, "strokeWidth", value.clone());
                    }
                    state
                        .attributes
                        .extra
                        .insert("stroke-width".to_string(), value.clone());
                    state
                        .attributes
                        .extra
                        .insert("strokeWidth".to_string(), value.clone());
                }
            }
            "stroke" => {
                if let Some(h) = handle {
                    self.surface.set_style(h, "stroke", value.clone());
                }
                state.attributes.extra.insert("stroke".to_string(), value.clone());
            }
            "autoplay" => {
                state.attributes.extra.insert("autoplay".to_string(), value.clone());
            }
            "visible" => match coerce_bool(&value) {
                Some(visible) => state.attributes.visible = Some(visible),
                None => tracing::warn!(?value, "ignored non-boolean visibility"),
            },
            _ => {}
        }
        state.add_config(key, value.clone());

        node.plugin.on_config_change(&mut node.state, key, &value);
        node.plugin.render(&node.state, &mut self.surface);
        self.dispatch_event(OBJECT_MODIFIED, json!({ "id": id.as_str() }))
    }

    /// Help text of a node's plugin, or [`HELP_FALLBACK`] when it cannot be loaded.
    pub fn help_text(&self, id: &NodeId) -> String {
        let Some(node) = self.instances.get(id) else {
            return HELP_FALLBACK.to_string();
        };
        let manifest = node.state.manifest();
        let Some(help) = &manifest.editor.help else {
            return HELP_FALLBACK.to_string();
        };
        match self.resources.load(manifest, &help.src) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(plugin = %manifest.id, "help not loaded: {e:#}");
                HELP_FALLBACK.to_string()
            }
        }
    }

    /// Location of a file shipped with a node's plugin.
    pub fn relative_url(&self, id: &NodeId, src: &str) -> EcmlResult<String> {
        let node = self.lookup(id)?;
        Ok(self.resources.resolve_url(node.state.manifest(), src))
    }
}

fn hydration_error(issues: &[FieldIssue]) -> EcmlError {
    let list = issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    EcmlError::validation(format!("ECML hydration issues: {list}"))
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
