use crate::ecml::model::EcmlNode;
use crate::foundation::core::NodeId;
use crate::manifest::model::Manifest;
use crate::node::state::NodeState;
use crate::session::registry::MenuRegistry;
use crate::surface::backend::{RenderHandle, RenderSurface, SurfaceEvent};
use serde_json::Value;
use std::fmt;

/// Behavior of a plugin type.
///
/// Every hook has a no-op default, so a type that overrides nothing still takes part in the
/// lifecycle, ECML marshalling and event routing. State lives in [`NodeState`]; hooks receive it
/// explicitly.
pub trait Plugin {
    /// Called once per type at registration, on the type's prototype.
    fn initialize(&mut self, _manifest: &Manifest) {}

    /// Called after ECML hydration; concrete types create their render object here.
    fn new_instance(&mut self, _node: &mut NodeState, _surface: &mut dyn RenderSurface) {}

    /// The render object was added to the surface.
    fn added(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// The render object was removed from the surface.
    fn removed(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// The render object was selected.
    fn selected(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// The render object lost selection.
    fn deselected(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// A drag, resize or rotation finished.
    fn changed(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// Fired continuously while rotating.
    fn rotating(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// Fired continuously while scaling.
    fn scaling(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// Fired continuously while dragging.
    fn moving(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// Fired continuously while skewing.
    fn skewing(&mut self, _node: &mut NodeState, _event: &SurfaceEvent) {}

    /// In-canvas duplication. Defaults to the live render handle.
    fn do_copy(&self, node: &NodeState) -> Option<RenderHandle> {
        node.render_handle()
    }

    /// Type-specific metadata.
    fn get_meta(&self, _node: &NodeState) -> Option<Value> {
        None
    }

    /// Type-specific content summary.
    fn get_summary(&self, _node: &NodeState) -> Option<Value> {
        None
    }

    /// Content pragma value.
    fn get_pragma_value(&self, _node: &NodeState) -> Option<Value> {
        None
    }

    /// Put the node on the surface. Defaults to adding the render object, if any.
    fn render(&mut self, node: &NodeState, surface: &mut dyn RenderSurface) {
        if let Some(handle) = node.render_handle() {
            surface.add(handle);
        }
    }

    /// Adjust context menu entries when the node gets selected.
    fn update_context_menu(&mut self, _node: &NodeState, _menus: &mut MenuRegistry) {}

    /// Reset type-specific configuration.
    fn re_config(&mut self, _node: &mut NodeState) {}

    /// A config property changed through the property panel.
    fn on_config_change(&mut self, _node: &mut NodeState, _key: &str, _value: &Value) {}
}

/// A plugin that overrides nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlankPlugin;

impl Plugin for BlankPlugin {}

/// Builds a fresh behavior object for each instance of a type.
pub type PluginFactory = Box<dyn Fn() -> Box<dyn Plugin>>;

/// A live node: per-instance state plus the type's behavior.
pub struct PluginNode {
    pub(crate) state: NodeState,
    pub(crate) plugin: Box<dyn Plugin>,
}

impl PluginNode {
    /// Pair state with behavior.
    pub fn new(state: NodeState, plugin: Box<dyn Plugin>) -> Self {
        Self { state, plugin }
    }

    /// Node id.
    pub fn id(&self) -> &NodeId {
        self.state.id()
    }

    /// Per-instance state.
    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// Mutable per-instance state.
    pub fn state_mut(&mut self) -> &mut NodeState {
        &mut self.state
    }

    /// Shallow copy through [`Plugin::do_copy`].
    pub fn do_copy(&self) -> Option<RenderHandle> {
        self.plugin.do_copy(&self.state)
    }

    /// See [`Plugin::get_meta`].
    pub fn meta(&self) -> Option<Value> {
        self.plugin.get_meta(&self.state)
    }

    /// See [`Plugin::get_summary`].
    pub fn summary(&self) -> Option<Value> {
        self.plugin.get_summary(&self.state)
    }

    /// See [`Plugin::get_pragma_value`].
    pub fn pragma_value(&self) -> Option<Value> {
        self.plugin.get_pragma_value(&self.state)
    }

    /// ECML serialization of the current state.
    pub fn to_ecml(&self) -> EcmlNode {
        self.state.to_ecml()
    }
}

impl fmt::Debug for PluginNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginNode")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/node/plugin.rs"]
mod tests;
