pub(crate) mod backend;
pub(crate) mod props;
pub(crate) mod scene;
