/// Convenience result type used across scrollguide.
pub type GuideResult<T> = Result<T, GuideError>;

/// Top-level error taxonomy.
///
/// Errors only surface at configuration and probing boundaries. Runtime paths (tracking,
/// interpolation, simulation) recover locally and never return a `GuideError`.
#[derive(thiserror::Error, Debug)]
pub enum GuideError {
    /// Invalid caller-provided data (waypoint tables, thresholds, geometry).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or checking a stage configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A platform signal query failed.
    #[error("signal error: {0}")]
    Signal(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GuideError {
    /// Build a [`GuideError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GuideError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`GuideError::Signal`] value.
    pub fn signal(msg: impl Into<String>) -> Self {
        Self::Signal(msg.into())
    }

    /// Build a [`GuideError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
