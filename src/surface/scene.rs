//! In-memory surface used by headless sessions, the CLI and tests.

use crate::foundation::core::NodeId;
use crate::surface::backend::{
    ObjectBounds, ObjectProps, RenderHandle, RenderSurface, SurfaceEvent, SurfaceEventKind,
};
use kurbo::{Rect, Vec2};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet, VecDeque};

#[derive(Clone, Debug)]
struct SceneObject {
    bounds: ObjectBounds,
    style: Map<String, Value>,
    id: Option<NodeId>,
    visible: bool,
    rotatable: bool,
    subscribed: HashSet<SurfaceEventKind>,
}

/// Display list plus an event queue; no pixels are produced.
#[derive(Debug, Default)]
pub struct SceneSurface {
    objects: BTreeMap<RenderHandle, SceneObject>,
    display_list: Vec<RenderHandle>,
    pending: VecDeque<SurfaceEvent>,
    next_handle: u64,
}

impl SceneSurface {
    /// Empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects on the display list, bottom to top.
    pub fn display_list(&self) -> &[RenderHandle] {
        &self.display_list
    }

    /// Number of live objects, on the display list or not.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Whether the rotation handle is enabled.
    pub fn is_rotatable(&self, handle: RenderHandle) -> bool {
        self.objects.get(&handle).is_some_and(|o| o.rotatable)
    }

    /// Event kinds an object is subscribed to, in [`SurfaceEventKind::ALL`] order.
    pub fn subscriptions(&self, handle: RenderHandle) -> Vec<SurfaceEventKind> {
        let Some(obj) = self.objects.get(&handle) else {
            return Vec::new();
        };
        SurfaceEventKind::ALL
            .into_iter()
            .filter(|k| obj.subscribed.contains(k))
            .collect()
    }

    /// Queue an event if the object subscribed to it.
    pub fn fire(&mut self, handle: RenderHandle, kind: SurfaceEventKind) {
        self.fire_with(handle, kind, Value::Null);
    }

    /// Queue an event with options if the object subscribed to it.
    pub fn fire_with(&mut self, handle: RenderHandle, kind: SurfaceEventKind, options: Value) {
        let subscribed = self
            .objects
            .get(&handle)
            .is_some_and(|o| o.subscribed.contains(&kind));
        if subscribed {
            self.pending.push_back(SurfaceEvent {
                kind,
                target: handle,
                options,
            });
        }
    }

    /// Simulate a drag that ends with the object's top-left corner at `(x, y)`.
    pub fn drag_to(&mut self, handle: RenderHandle, x: f64, y: f64) {
        let Some(obj) = self.objects.get_mut(&handle) else {
            return;
        };
        let r = obj.bounds.rect;
        obj.bounds.rect = r + Vec2::new(x - r.x0, y - r.y0);
        self.fire(handle, SurfaceEventKind::Moving);
        self.fire(handle, SurfaceEventKind::Modified);
    }

    /// Simulate a resize that ends at `width` x `height`.
    pub fn resize_to(&mut self, handle: RenderHandle, width: f64, height: f64) {
        let Some(obj) = self.objects.get_mut(&handle) else {
            return;
        };
        let r = obj.bounds.rect;
        obj.bounds.rect = Rect::new(r.x0, r.y0, r.x0 + width, r.y0 + height);
        self.fire(handle, SurfaceEventKind::Scaling);
        self.fire(handle, SurfaceEventKind::Modified);
    }

    /// Simulate a rotation that ends at `angle` degrees.
    pub fn rotate_to(&mut self, handle: RenderHandle, angle: f64) {
        let Some(obj) = self.objects.get_mut(&handle) else {
            return;
        };
        obj.bounds.angle = angle;
        self.fire(handle, SurfaceEventKind::Rotating);
        self.fire(handle, SurfaceEventKind::Modified);
    }
}

impl RenderSurface for SceneSurface {
    fn create_object(&mut self, props: ObjectProps) -> RenderHandle {
        self.next_handle += 1;
        let handle = RenderHandle(self.next_handle);
        self.objects.insert(
            handle,
            SceneObject {
                bounds: props.bounds.unwrap_or(ObjectBounds {
                    rect: Rect::ZERO,
                    angle: 0.0,
                }),
                style: props.style,
                id: None,
                visible: false,
                rotatable: false,
                subscribed: HashSet::new(),
            },
        );
        handle
    }

    fn destroy_object(&mut self, handle: RenderHandle) {
        self.display_list.retain(|h| *h != handle);
        self.objects.remove(&handle);
    }

    fn bounds(&self, handle: RenderHandle) -> Option<ObjectBounds> {
        self.objects.get(&handle).map(|o| o.bounds)
    }

    fn set_bounds(&mut self, handle: RenderHandle, bounds: ObjectBounds) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.bounds = bounds;
        }
    }

    fn style(&self, handle: RenderHandle, key: &str) -> Option<Value> {
        self.objects.get(&handle)?.style.get(key).cloned()
    }

    fn set_style(&mut self, handle: RenderHandle, key: &str, value: Value) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.style.insert(key.to_string(), value);
        }
    }

    fn set_object_id(&mut self, handle: RenderHandle, id: &NodeId) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.id = Some(id.clone());
        }
    }

    fn object_id(&self, handle: RenderHandle) -> Option<NodeId> {
        self.objects.get(&handle)?.id.clone()
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.visible = visible;
        }
    }

    fn is_visible(&self, handle: RenderHandle) -> bool {
        self.objects.get(&handle).is_some_and(|o| o.visible)
    }

    fn set_rotatable(&mut self, handle: RenderHandle, rotatable: bool) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.rotatable = rotatable;
        }
    }

    fn subscribe(&mut self, handle: RenderHandle, kinds: &[SurfaceEventKind]) {
        if let Some(obj) = self.objects.get_mut(&handle) {
            obj.subscribed.extend(kinds.iter().copied());
        }
    }

    fn add(&mut self, handle: RenderHandle) {
        if !self.objects.contains_key(&handle) || self.display_list.contains(&handle) {
            return;
        }
        self.display_list.push(handle);
        self.fire(handle, SurfaceEventKind::Added);
    }

    fn remove(&mut self, handle: RenderHandle) {
        let before = self.display_list.len();
        self.display_list.retain(|h| *h != handle);
        if self.display_list.len() != before {
            self.fire(handle, SurfaceEventKind::Removed);
        }
    }

    fn contains(&self, handle: RenderHandle) -> bool {
        self.display_list.contains(&handle)
    }

    fn poll_events(&mut self) -> Vec<SurfaceEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/scene.rs"]
mod tests;
