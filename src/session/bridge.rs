//! Routing of surface object events back to the owning nodes.

use crate::foundation::core::NodeId;
use crate::node::plugin::PluginNode;
use crate::session::editor::EditorSession;
use crate::surface::backend::{RenderSurface, SurfaceEvent, SurfaceEventKind};

impl<S: RenderSurface> EditorSession<S> {
    /// Drain the surface event queue and route every event. Events queued while routing are
    /// drained too. Returns the number of events seen.
    #[tracing::instrument(skip(self))]
    pub fn pump_surface_events(&mut self) -> usize {
        let mut seen = 0;
        loop {
            let events = self.surface.poll_events();
            if events.is_empty() {
                return seen;
            }
            seen += events.len();
            for event in events {
                self.handle_surface_event(&event);
            }
        }
    }

    /// Route one surface event to the node whose render object fired it.
    ///
    /// Events from objects that do not belong to a live node are dropped.
    pub fn handle_surface_event(&mut self, event: &SurfaceEvent) {
        let Some(id) = self.surface.object_id(event.target) else {
            tracing::debug!(kind = event.kind.name(), "event from an unowned object");
            return;
        };
        let Some(node) = self.instances.get_mut(&id) else {
            tracing::debug!(kind = event.kind.name(), node = %id, "event for an unknown node");
            return;
        };
        let PluginNode { state, plugin } = node;

        match event.kind {
            SurfaceEventKind::Added => {
                plugin.added(state, event);
                self.sync_dimensions(&id);
            }
            SurfaceEventKind::Modified => {
                plugin.changed(state, event);
                self.sync_dimensions(&id);
            }
            SurfaceEventKind::Removed => {
                plugin.removed(state, event);
                self.remove_cascade(&id, event);
            }
            SurfaceEventKind::Selected => plugin.selected(state, event),
            SurfaceEventKind::Deselected => plugin.deselected(state, event),
            SurfaceEventKind::Rotating => plugin.rotating(state, event),
            SurfaceEventKind::Scaling => plugin.scaling(state, event),
            SurfaceEventKind::Moving => plugin.moving(state, event),
            SurfaceEventKind::Skewing => plugin.skewing(state, event),
        }
    }

    fn sync_dimensions(&mut self, id: &NodeId) {
        if let Err(e) = self.update_plugin_dimensions(id) {
            tracing::debug!(node = %id, "dimension sync skipped: {e}");
        }
    }

    /// Depth-first ids of every descendant of `id`, parents before their children.
    pub fn descendants(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .instances
            .get(id)
            .map(|n| n.state.children().iter().rev().cloned().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            if let Some(node) = self.instances.get(&next) {
                stack.extend(node.state.children().iter().rev().cloned());
            }
            out.push(next);
        }
        out
    }

    fn remove_cascade(&mut self, id: &NodeId, event: &SurfaceEvent) {
        for child in self.descendants(id) {
            let Some(mut node) = self.instances.remove(&child) else {
                continue;
            };
            let handle = node.state.render_handle();
            let child_event = SurfaceEvent {
                target: handle.unwrap_or(event.target),
                ..event.clone()
            };
            let PluginNode { state, plugin } = &mut node;
            plugin.removed(state, &child_event);
            if let Some(handle) = handle {
                self.surface.remove(handle);
            }
            tracing::debug!(node = %child, parent = %id, "removed with ancestor");
        }
        self.remove(id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/bridge.rs"]
mod tests;
