//! Session types for presentation session management.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DisplayId, OverlayType};

/// Unique identifier for a presentation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a presentation session.
///
/// States only move forward in declaration order; `Dismissed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Constructed, not yet bound to a display
    Uninitialized,
    /// Bound to a display with an overlay window
    Created,
    /// Content tree built and controls wired
    ContentBound,
    /// Visible on its display
    Showing,
    /// Torn down
    Dismissed,
}

impl SessionState {
    /// Check whether the session still owns a surface.
    pub fn is_live(&self) -> bool {
        !matches!(self, SessionState::Uninitialized | SessionState::Dismissed)
    }
}

/// Snapshot of a presentation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Session identifier
    pub id: SessionId,
    /// Current state
    pub state: SessionState,
    /// Display the session is bound to
    pub display: Option<DisplayId>,
    /// Overlay window type in use
    pub overlay_type: Option<OverlayType>,
}

impl SessionInfo {
    /// Create new session info.
    pub fn new(
        id: SessionId,
        state: SessionState,
        display: Option<DisplayId>,
        overlay_type: Option<OverlayType>,
    ) -> Self {
        Self {
            id,
            state,
            display,
            overlay_type,
        }
    }
}
