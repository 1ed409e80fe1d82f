//! # presentation-core
//!
//! Core types for presentation sessions.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other presentation crates. It provides:
//!
//! - Display and route types (Display, DisplayId, Route, RouteCapability)
//! - Platform version and overlay window policy (PlatformVersion, OverlayType)
//! - Authorization state
//! - Session types (SessionId, SessionState, SessionInfo)
//! - Cross-surface event and notice types
//! - Configuration and error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other presentation crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod authorization;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod platform;
pub mod session;

// Re-export commonly used types
pub use authorization::AuthorizationState;
pub use config::{
    AuthorizationSettings, ContentSettings, LoggingSettings, PlatformSettings,
    PresentationConfig, ResolveStrategy, RoutingSettings,
};
pub use display::{Display, DisplayId, Route, RouteCapability};
pub use error::{Error, Result};
pub use event::{Notice, NoticeKind, SurfaceEvent};
pub use platform::{overlay_type_for, OverlayType, PlatformVersion};
pub use session::{SessionId, SessionInfo, SessionState};
