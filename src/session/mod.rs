pub(crate) mod bridge;
pub(crate) mod editor;
pub(crate) mod registry;
