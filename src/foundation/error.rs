/// Convenience result type used across the editor core.
pub type EcmlResult<T> = Result<T, EcmlError>;

/// Top-level error taxonomy used by editor APIs.
///
/// Malformed ECML input does not surface here unless strict parsing is requested; see
/// [`crate::Parsed::into_strict`].
#[derive(thiserror::Error, Debug)]
pub enum EcmlError {
    /// Invalid user-provided ECML or manifest data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Lookups against the plugin type or instance registries.
    #[error("registry error: {0}")]
    Registry(String),

    /// Plugin resource loading failures.
    #[error("resource error: {0}")]
    Resource(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EcmlError {
    /// Build a [`EcmlError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EcmlError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`EcmlError::Registry`] value.
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Build a [`EcmlError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
