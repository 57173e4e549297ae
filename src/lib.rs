//! Object-lifecycle and ECML marshalling core of a visual content editor.
//!
//! Every element on the editing canvas is a plugin node: per-instance [`NodeState`] plus a
//! [`Plugin`] behavior. An [`EditorSession`] owns the nodes and drives them:
//!
//! - Register plugin types from their [`Manifest`]
//! - Instantiate nodes from ECML attribute trees ([`EcmlNode`], percent space)
//! - Route [`RenderSurface`] events back to node hooks
//! - Serialize nodes back to ECML
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod ecml;
pub(crate) mod manifest;
pub(crate) mod node;
pub(crate) mod session;
pub(crate) mod surface;
/// Pixel/percent conversions against the virtual canvas.
pub mod transform;

pub use crate::foundation::core::{CANVAS_HEIGHT, CANVAS_WIDTH, Geometry, NodeId};
pub use crate::foundation::error::{EcmlError, EcmlResult};

pub use crate::ecml::model::{
    CDATA_KEY, EcmlBlock, EcmlNode, EcmlParam, FieldIssue, IssueKind, Media, Parsed,
};
pub use crate::manifest::config::{base_config_manifest, merge_config_manifest};
pub use crate::manifest::model::{
    Behaviour, ConfigProperty, EditorManifest, HelpResource, Manifest, MenuItem, SubMenuItem,
};
pub use crate::node::attributes::Attributes;
pub use crate::node::plugin::{BlankPlugin, Plugin, PluginFactory, PluginNode};
pub use crate::node::state::{NodeState, default_config};
pub use crate::session::editor::{
    EditorSession, HELP_FALLBACK, OBJECT_MODIFIED, STAGE_TYPE, SessionOpts,
};
pub use crate::session::registry::{
    DirResources, EditorEvent, EventListener, MediaRegistry, MediaResolver, MenuRegistry,
    PluginResources,
};
pub use crate::surface::backend::{
    ObjectBounds, ObjectProps, RenderHandle, RenderSurface, SurfaceEvent, SurfaceEventKind,
};
pub use crate::surface::props::{bounds_from_geometry, to_surface_props};
pub use crate::surface::scene::SceneSurface;
