//! Platform version and overlay window policy.
//!
//! Which overlay window type a presentation surface may use is a discrete
//! compatibility decision keyed on the platform version. Getting it wrong makes
//! the window manager reject the surface, so the lookup lives here as a pure
//! function that can be tested without a live platform.

use serde::{Deserialize, Serialize};

/// Platform API level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformVersion(u32);

impl PlatformVersion {
    /// First version on which drawing over other applications needs a
    /// runtime grant.
    pub const OVERLAY_PERMISSION: PlatformVersion = PlatformVersion(23);

    /// First version that accepts the application overlay window type.
    pub const APPLICATION_OVERLAY: PlatformVersion = PlatformVersion(26);

    /// Create a version from its API level.
    pub const fn new(level: u32) -> Self {
        Self(level)
    }

    /// Get the API level.
    pub fn level(&self) -> u32 {
        self.0
    }

    /// Check whether overlay drawing must be explicitly authorized.
    ///
    /// Below [`PlatformVersion::OVERLAY_PERMISSION`] the grant is implicit.
    pub fn requires_overlay_permission(&self) -> bool {
        *self >= Self::OVERLAY_PERMISSION
    }

    /// Overlay window type accepted by this version.
    pub fn overlay_type(&self) -> OverlayType {
        overlay_type_for(*self)
    }
}

impl From<u32> for PlatformVersion {
    fn from(level: u32) -> Self {
        Self(level)
    }
}

impl std::fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API {}", self.0)
    }
}

/// Window type used to place the presentation surface above other
/// applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayType {
    /// Application overlay window (newer platforms)
    ApplicationOverlay,
    /// Legacy system alert window (older platforms)
    SystemAlert,
}

impl OverlayType {
    /// Get the overlay type name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            OverlayType::ApplicationOverlay => "application_overlay",
            OverlayType::SystemAlert => "system_alert",
        }
    }
}

impl std::fmt::Display for OverlayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Select the overlay window type for a platform version.
///
/// Versions at or above [`PlatformVersion::APPLICATION_OVERLAY`] get
/// [`OverlayType::ApplicationOverlay`]; everything older gets
/// [`OverlayType::SystemAlert`].
///
/// # Examples
///
/// ```
/// use presentation_core::{overlay_type_for, OverlayType, PlatformVersion};
///
/// assert_eq!(overlay_type_for(PlatformVersion::new(26)), OverlayType::ApplicationOverlay);
/// assert_eq!(overlay_type_for(PlatformVersion::new(25)), OverlayType::SystemAlert);
/// ```
pub fn overlay_type_for(version: PlatformVersion) -> OverlayType {
    if version >= PlatformVersion::APPLICATION_OVERLAY {
        OverlayType::ApplicationOverlay
    } else {
        OverlayType::SystemAlert
    }
}
