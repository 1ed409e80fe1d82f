//! Overlay authorization.
//!
//! Drawing the presentation surface above other applications needs a
//! system-level grant on newer platforms. The grant is requested through an
//! out-of-process settings screen; its outcome comes back later as a result
//! carrying the request code, which is matched against a single pending slot.

use std::sync::Arc;

use tracing::{debug, info, warn};

use presentation_core::{AuthorizationState, PlatformVersion, Result};

use crate::platform::OverlayPermissionSystem;

/// Request sent to the permission settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    /// Code the result will be delivered with
    pub request_code: u32,
    /// Identity of the requesting application
    pub app_id: String,
}

impl PermissionRequest {
    /// Create a permission request.
    pub fn new(request_code: u32, app_id: impl Into<String>) -> Self {
        Self {
            request_code,
            app_id: app_id.into(),
        }
    }

    /// Address of the settings page scoped to the requesting application.
    pub fn settings_uri(&self) -> String {
        format!("package:{}", self.app_id)
    }
}

/// Owned holder of the overlay authorization state.
pub struct OverlayAuthorization {
    version: PlatformVersion,
    system: Arc<dyn OverlayPermissionSystem>,
    request: PermissionRequest,
    state: AuthorizationState,
    pending: Option<u32>,
}

impl OverlayAuthorization {
    /// Create an authorization holder in the [`AuthorizationState::Unknown`] state.
    pub fn new(
        version: PlatformVersion,
        system: Arc<dyn OverlayPermissionSystem>,
        request: PermissionRequest,
    ) -> Self {
        Self {
            version,
            system,
            request,
            state: AuthorizationState::Unknown,
            pending: None,
        }
    }

    /// Last known authorization state.
    pub fn state(&self) -> AuthorizationState {
        self.state
    }

    /// Check whether a permission request is awaiting its result.
    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    /// Check the grant with the platform.
    ///
    /// Always true below [`PlatformVersion::OVERLAY_PERMISSION`]. A missing
    /// grant only moves the state out of [`AuthorizationState::Unknown`] once
    /// a permission result has been delivered; a revoked grant moves it back
    /// to [`AuthorizationState::Denied`].
    pub fn is_granted(&mut self) -> bool {
        let granted = self.check();
        if granted {
            self.record(AuthorizationState::Granted);
        } else if self.state == AuthorizationState::Granted {
            self.record(AuthorizationState::Denied);
        }
        granted
    }

    fn check(&self) -> bool {
        !self.version.requires_overlay_permission() || self.system.can_draw_overlays()
    }

    fn record(&mut self, state: AuthorizationState) {
        if state != self.state {
            debug!("Authorization state changed: {:?} → {:?}", self.state, state);
            self.state = state;
        }
    }

    /// Launch the permission settings screen.
    ///
    /// Does nothing when the permission is already granted or a request is
    /// already pending.
    pub fn request_authorization(&mut self) -> Result<()> {
        if self.is_granted() {
            debug!("Overlay permission already granted, no request needed");
            return Ok(());
        }
        if let Some(code) = self.pending {
            debug!("Permission request {} still pending", code);
            return Ok(());
        }

        info!(
            "Requesting overlay permission: code={}, uri={}",
            self.request.request_code,
            self.request.settings_uri()
        );
        self.system.launch_settings(&self.request)?;
        self.pending = Some(self.request.request_code);
        Ok(())
    }

    /// Handle the result of a permission request.
    ///
    /// A result whose code matches the pending request clears the slot and
    /// re-checks the grant. Any other code is ignored and returns `None`.
    pub fn on_authorization_result(&mut self, request_code: u32) -> Option<AuthorizationState> {
        if self.pending != Some(request_code) {
            warn!(
                "Ignoring authorization result with unexpected code {} (pending: {:?})",
                request_code, self.pending
            );
            return None;
        }

        self.pending = None;
        let granted = self.check();
        self.record(AuthorizationState::from_granted(granted));
        info!(
            "Authorization result: code={}, state={:?}",
            request_code, self.state
        );
        Some(self.state)
    }
}
