pub(crate) mod attributes;
pub(crate) mod plugin;
pub(crate) mod state;
