//! # presentation-session
//!
//! Presentation session lifecycle management.
//!
//! This crate provides:
//! - Secondary display discovery through media routes or display enumeration
//! - Overlay authorization with a single pending permission request
//! - The presentation session state machine
//! - Cross-surface event routing back to the primary context
//! - A controller owning at most one live session
//! - An in-memory simulated platform
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on presentation-core and
//! talks to the platform only through the traits in [`platform`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authorization;
pub mod bridge;
pub mod content;
pub mod controller;
pub mod platform;
pub mod resolver;
pub mod session;
pub mod simulated;

// Re-export commonly used types
pub use authorization::{OverlayAuthorization, PermissionRequest};
pub use bridge::{CrossSurfaceEventBridge, EventOutcome};
pub use content::{ContentRoot, LocalControl};
pub use controller::PresentationController;
pub use platform::{
    primary_handle, DialogRequest, OverlayPermissionSystem, PlatformServices, PrimaryContext,
    RouteProvider, SurfaceHost, SurfaceId,
};
pub use resolver::DisplayRouteResolver;
pub use session::PresentationSession;
pub use simulated::{PlatformSpec, RecordingPrimary, SimulatedPlatform};
