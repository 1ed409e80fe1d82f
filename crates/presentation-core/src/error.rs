//! Error types for presentation session management.

use thiserror::Error;

use crate::SessionId;

/// Main error type for presentation operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No capable route or display found
    #[error("No presentation route available")]
    NoRoute,

    /// Overlay authorization not granted
    #[error("Overlay permission denied")]
    PermissionDenied,

    /// Display handle is absent or cannot host a presentation
    #[error("Invalid display: {0}")]
    InvalidDisplay(String),

    /// Session lifecycle misuse (double bind, show before create, ...)
    #[error("Illegal session state: {0}")]
    IllegalState(String),

    /// A presentation session is already live
    #[error("Presentation session already active: {0}")]
    SessionActive(SessionId),

    /// The window system refused to open or show the surface
    #[error("Surface rejected: {0}")]
    SurfaceRejected(String),

    /// No handler registered for a cross-surface event
    #[error("Unhandled event: {0}")]
    UnhandledEvent(String),

    /// Content root has no control with the given name
    #[error("Unknown control: {0}")]
    UnknownControl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is an expected runtime condition that the controller
    /// turns into a user notice.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoRoute | Error::PermissionDenied)
    }

    /// Whether the error signals misuse of the session lifecycle.
    pub fn is_lifecycle_defect(&self) -> bool {
        matches!(self, Error::IllegalState(_))
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
