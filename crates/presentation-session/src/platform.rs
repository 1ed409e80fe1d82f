//! Platform seams.
//!
//! The session engine never talks to a window system directly. Route and
//! display discovery, the overlay permission subsystem, window placement and
//! the primary UI are all reached through the traits in this module, so the
//! lifecycle can run against a real platform binding or the in-memory
//! [`crate::simulated`] one.

use std::sync::{Arc, Weak};

use presentation_core::{Display, Notice, OverlayType, Result, Route};

use crate::authorization::PermissionRequest;

/// Query-only view of the platform's output routes and displays.
pub trait RouteProvider: Send + Sync {
    /// List the routes currently known to the platform.
    fn routes(&self) -> Vec<Route>;

    /// List all displays, built-in display first.
    fn displays(&self) -> Vec<Arc<Display>>;
}

/// System-level permission to draw above other applications.
pub trait OverlayPermissionSystem: Send + Sync {
    /// Check whether overlay drawing is currently permitted.
    fn can_draw_overlays(&self) -> bool;

    /// Open the system settings screen where the user grants the permission.
    ///
    /// Returns as soon as the screen is launched. The outcome arrives later
    /// through [`crate::OverlayAuthorization::on_authorization_result`] with
    /// the request code carried by `request`.
    fn launch_settings(&self, request: &PermissionRequest) -> Result<()>;
}

/// Opaque identifier of a window opened by a [`SurfaceHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Create a surface identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Window system hosting presentation surfaces.
pub trait SurfaceHost: Send + Sync {
    /// Open a hidden window of the given overlay type on a display.
    ///
    /// Fails with [`presentation_core::Error::SurfaceRejected`] when the window
    /// system refuses the window type.
    fn open(&self, display: &Display, overlay: OverlayType) -> Result<SurfaceId>;

    /// Show or hide an open window.
    fn set_visible(&self, surface: SurfaceId, visible: bool) -> Result<()>;

    /// Close a window and release everything attached to it.
    fn close(&self, surface: SurfaceId);
}

/// Dialog the secondary surface asks the primary context to display.
pub struct DialogRequest {
    /// Dialog title
    pub title: String,
    /// Dialog message
    pub message: String,
    /// Confirm button label
    pub confirm_label: String,
    /// Whether the dialog may be dismissed without confirming
    pub cancelable: bool,
    on_confirm: Option<Box<dyn FnOnce() + Send>>,
}

impl DialogRequest {
    /// Create a non-cancelable dialog request.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: confirm_label.into(),
            cancelable: false,
            on_confirm: None,
        }
    }

    /// Set the callback run when the user confirms the dialog.
    pub fn on_confirm(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.on_confirm = Some(Box::new(callback));
        self
    }

    /// Confirm the dialog, running its acknowledgement callback.
    pub fn confirm(mut self) {
        if let Some(callback) = self.on_confirm.take() {
            callback();
        }
    }
}

impl std::fmt::Debug for DialogRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogRequest")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("confirm_label", &self.confirm_label)
            .field("cancelable", &self.cancelable)
            .field("has_callback", &self.on_confirm.is_some())
            .finish()
    }
}

/// The primary application window.
///
/// Implementations decide which execution context the calls land on; a UI
/// binding typically posts them to its event loop.
pub trait PrimaryContext: Send + Sync {
    /// Display a dialog owned by the primary window.
    fn show_dialog(&self, dialog: DialogRequest);

    /// Display a transient notice.
    fn show_notice(&self, notice: Notice);
}

/// Create the non-owning handle sessions keep to the primary context.
pub fn primary_handle<P: PrimaryContext + 'static>(primary: &Arc<P>) -> Weak<dyn PrimaryContext> {
    Arc::downgrade(primary) as Weak<dyn PrimaryContext>
}

/// Platform services a controller is built from.
#[derive(Clone)]
pub struct PlatformServices {
    /// Route and display discovery
    pub routes: Arc<dyn RouteProvider>,
    /// Overlay permission subsystem
    pub permissions: Arc<dyn OverlayPermissionSystem>,
    /// Window system
    pub surfaces: Arc<dyn SurfaceHost>,
}

impl PlatformServices {
    /// Use one platform object for every service.
    pub fn from_platform<P>(platform: Arc<P>) -> Self
    where
        P: RouteProvider + OverlayPermissionSystem + SurfaceHost + 'static,
    {
        Self {
            routes: Arc::clone(&platform) as Arc<dyn RouteProvider>,
            permissions: Arc::clone(&platform) as Arc<dyn OverlayPermissionSystem>,
            surfaces: platform,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_dialog_request_defaults() {
        let dialog = DialogRequest::new("Title", "Body", "OK");
        assert_eq!(dialog.title, "Title");
        assert_eq!(dialog.message, "Body");
        assert_eq!(dialog.confirm_label, "OK");
        assert!(!dialog.cancelable);
    }

    #[test]
    fn test_dialog_confirm_runs_callback_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let dialog = DialogRequest::new("t", "m", "OK").on_confirm(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dialog.confirm();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dialog_confirm_without_callback() {
        DialogRequest::new("t", "m", "OK").confirm();
    }

    #[test]
    fn test_dialog_debug_hides_callback() {
        let dialog = DialogRequest::new("t", "m", "OK").on_confirm(|| {});
        let debug = format!("{dialog:?}");
        assert!(debug.contains("has_callback: true"));
    }

    #[test]
    fn test_surface_id_display() {
        assert_eq!(SurfaceId::new(7).to_string(), "surface-7");
    }
}
