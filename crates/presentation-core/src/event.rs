//! Cross-surface events and user notices.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Discrete UI event raised on the secondary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SurfaceEvent {
    /// Ask the primary context to show a dialog
    RequestDialog,
    /// Tear down the presentation session from within
    DismissSession,
}

impl SurfaceEvent {
    /// Get the event name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            SurfaceEvent::RequestDialog => "request-dialog",
            SurfaceEvent::DismissSession => "dismiss-session",
        }
    }
}

impl std::fmt::Display for SurfaceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SurfaceEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request-dialog" => Ok(SurfaceEvent::RequestDialog),
            "dismiss-session" => Ok(SurfaceEvent::DismissSession),
            other => Err(Error::UnhandledEvent(other.to_string())),
        }
    }
}

/// Kind of a transient notice shown on the primary surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// No presentation route is available
    Unsupported,
    /// Overlay permission was granted
    PermissionGranted,
    /// Overlay permission was denied
    PermissionDenied,
    /// The user confirmed a dialog requested by the secondary surface
    DialogAcknowledged,
}

/// Transient notice for the primary surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Notice kind
    pub kind: NoticeKind,
    /// Text shown to the user
    pub message: String,
}

impl Notice {
    /// Create a notice.
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
