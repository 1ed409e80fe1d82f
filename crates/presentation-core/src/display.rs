//! Display and route types.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Platform identifier of a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(u32);

impl DisplayId {
    /// Identifier of the built-in display.
    pub const DEFAULT: DisplayId = DisplayId(0);

    /// Create a display identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical or virtual output surface.
///
/// Displays are owned by the platform. Sessions hold an `Arc<Display>` only
/// while they are bound and drop it on dismiss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Display identifier
    pub id: DisplayId,
    /// Human-readable name
    pub name: String,
    /// Whether a presentation surface may be placed on this display
    pub presentation_capable: bool,
}

impl Display {
    /// Create a presentation-capable display.
    pub fn new(id: DisplayId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            presentation_capable: true,
        }
    }

    /// Create a display that cannot host a presentation.
    pub fn without_presentation(id: DisplayId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            presentation_capable: false,
        }
    }

    /// Check whether this is the built-in display.
    pub fn is_default(&self) -> bool {
        self.id == DisplayId::DEFAULT
    }
}

/// Capability a route may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteCapability {
    /// Live audio output; presentation displays hang off these routes
    LiveAudio,
    /// Live video output
    LiveVideo,
    /// Application-defined route
    UserDefined,
}

impl std::fmt::Display for RouteCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteCapability::LiveAudio => write!(f, "live_audio"),
            RouteCapability::LiveVideo => write!(f, "live_video"),
            RouteCapability::UserDefined => write!(f, "user_defined"),
        }
    }
}

/// A candidate output target reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route name
    pub name: String,
    /// Capabilities offered by the route
    pub capabilities: Vec<RouteCapability>,
    /// Whether the platform currently selects this route for its capabilities
    pub selected: bool,
    /// Display associated with the route, if it can present
    pub presentation_display: Option<Arc<Display>>,
}

impl Route {
    /// Create a route with no display.
    pub fn new(name: impl Into<String>, capabilities: Vec<RouteCapability>) -> Self {
        Self {
            name: name.into(),
            capabilities,
            selected: false,
            presentation_display: None,
        }
    }

    /// Attach a presentation display.
    pub fn with_display(mut self, display: Arc<Display>) -> Self {
        self.presentation_display = Some(display);
        self
    }

    /// Mark the route as selected.
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Check whether the route offers a capability.
    pub fn supports(&self, capability: RouteCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}
