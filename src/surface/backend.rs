use crate::foundation::core::NodeId;
use kurbo::Rect;
use serde_json::{Map, Value};

/// Owned reference to an object on a [`RenderSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderHandle(pub u64);

/// Object events a surface reports for subscribed objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceEventKind {
    /// Object was added to the display list.
    Added,
    /// Object was removed from the display list.
    Removed,
    /// Object gained selection.
    Selected,
    /// Object lost selection.
    Deselected,
    /// A drag, resize or rotation finished.
    Modified,
    /// Object is being rotated.
    Rotating,
    /// Object is being scaled.
    Scaling,
    /// Object is being dragged.
    Moving,
    /// Object is being skewed.
    Skewing,
}

impl SurfaceEventKind {
    /// Every event kind, in subscription order.
    pub const ALL: [SurfaceEventKind; 9] = [
        Self::Added,
        Self::Removed,
        Self::Selected,
        Self::Deselected,
        Self::Modified,
        Self::Rotating,
        Self::Scaling,
        Self::Moving,
        Self::Skewing,
    ];

    /// Event name as used by the surface.
    pub fn name(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Selected => "selected",
            Self::Deselected => "deselected",
            Self::Modified => "modified",
            Self::Rotating => "rotating",
            Self::Scaling => "scaling",
            Self::Moving => "moving",
            Self::Skewing => "skewing",
        }
    }
}

/// An event fired by a surface object.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceEvent {
    /// Event kind.
    pub kind: SurfaceEventKind,
    /// Object that fired the event.
    pub target: RenderHandle,
    /// Surface-specific event options.
    pub options: Value,
}

impl SurfaceEvent {
    /// Event without options.
    pub fn new(kind: SurfaceEventKind, target: RenderHandle) -> Self {
        Self {
            kind,
            target,
            options: Value::Null,
        }
    }
}

/// Pixel bounds and rotation of a surface object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectBounds {
    /// Axis-aligned box before rotation.
    pub rect: Rect,
    /// Rotation in degrees.
    pub angle: f64,
}

/// Creation parameters for a surface object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectProps {
    /// Initial bounds.
    pub bounds: Option<ObjectBounds>,
    /// Initial style properties (surface names, e.g. `fill`, `stroke`, `opacity`).
    pub style: Map<String, Value>,
}

/// The rendering surface the editor core drives.
///
/// Only the small attribute subset the core needs is exposed. Events for subscribed objects are
/// queued by the surface and drained with [`RenderSurface::poll_events`].
pub trait RenderSurface {
    /// Create a new object; it is not on the display list yet.
    fn create_object(&mut self, props: ObjectProps) -> RenderHandle;

    /// Drop an object entirely.
    fn destroy_object(&mut self, handle: RenderHandle);

    /// Current bounds of an object.
    fn bounds(&self, handle: RenderHandle) -> Option<ObjectBounds>;

    /// Move or resize an object.
    fn set_bounds(&mut self, handle: RenderHandle, bounds: ObjectBounds);

    /// Read a style property.
    fn style(&self, handle: RenderHandle, key: &str) -> Option<Value>;

    /// Write a style property.
    fn set_style(&mut self, handle: RenderHandle, key: &str, value: Value);

    /// Stamp the owning node id onto an object.
    fn set_object_id(&mut self, handle: RenderHandle, id: &NodeId);

    /// Node id stamped onto an object.
    fn object_id(&self, handle: RenderHandle) -> Option<NodeId>;

    /// Show or hide an object.
    fn set_visible(&mut self, handle: RenderHandle, visible: bool);

    /// Whether an object is shown.
    fn is_visible(&self, handle: RenderHandle) -> bool;

    /// Enable or disable the rotation handle.
    fn set_rotatable(&mut self, handle: RenderHandle, rotatable: bool);

    /// Subscribe to object events.
    fn subscribe(&mut self, handle: RenderHandle, kinds: &[SurfaceEventKind]);

    /// Put an object on the display list.
    fn add(&mut self, handle: RenderHandle);

    /// Take an object off the display list.
    fn remove(&mut self, handle: RenderHandle);

    /// Whether an object is on the display list.
    fn contains(&self, handle: RenderHandle) -> bool;

    /// Drain queued events in firing order.
    fn poll_events(&mut self) -> Vec<SurfaceEvent>;
}
