//! Error types for emtag-core.

/// Error from registering or locating rules in a [`CoreRuler`](crate::CoreRuler).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulerError {
    /// A rule with the same name is already registered.
    #[error("Rule already registered: {0}")]
    Duplicate(String),
    /// No rule with this name is registered.
    #[error("Rule not found: {0}")]
    NotFound(String),
}

/// String is not one of the four emphasis markers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown emphasis marker: {0:?} (expected one of \"_\", \"__\", \"*\", \"**\")")]
pub struct UnknownMarker(pub String);
