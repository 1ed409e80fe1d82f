//! Presentation controller owning at most one live session.

use std::sync::{Arc, Weak};

use tracing::{debug, error, info, warn};

use presentation_core::{
    AuthorizationState, Display, Error, Notice, NoticeKind, PresentationConfig, Result,
    SessionId, SessionInfo, SessionState, SurfaceEvent,
};

use crate::authorization::{OverlayAuthorization, PermissionRequest};
use crate::bridge::EventOutcome;
use crate::platform::{PlatformServices, PrimaryContext, SurfaceHost};
use crate::resolver::DisplayRouteResolver;
use crate::session::PresentationSession;

/// Orchestrates route resolution, authorization and the session lifecycle.
///
/// All methods are expected to run on the primary context's UI thread; the
/// controller holds no locks and spawns no work.
pub struct PresentationController {
    config: PresentationConfig,
    resolver: DisplayRouteResolver,
    authorization: OverlayAuthorization,
    surfaces: Arc<dyn SurfaceHost>,
    primary: Weak<dyn PrimaryContext>,
    current: Option<PresentationSession>,
}

impl PresentationController {
    /// Create a controller for a primary context.
    pub fn new(
        config: PresentationConfig,
        services: PlatformServices,
        primary: Weak<dyn PrimaryContext>,
    ) -> Self {
        let resolver = DisplayRouteResolver::with_strategy(services.routes, config.routing.strategy);
        let authorization = OverlayAuthorization::new(
            config.platform.version,
            services.permissions,
            PermissionRequest::new(
                config.authorization.request_code,
                config.authorization.app_id.clone(),
            ),
        );

        Self {
            config,
            resolver,
            authorization,
            surfaces: services.surfaces,
            primary,
            current: None,
        }
    }

    /// Last known overlay authorization state.
    pub fn authorization_state(&self) -> AuthorizationState {
        self.authorization.state()
    }

    /// Snapshot of the current session, if any.
    pub fn current_session(&self) -> Option<SessionInfo> {
        self.current.as_ref().map(PresentationSession::info)
    }

    /// Check whether a session is live.
    pub fn has_live_session(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|session| session.state().is_live())
    }

    /// Startup permission check: request the overlay permission if missing.
    pub fn check_authorization(&mut self) -> Result<AuthorizationState> {
        if self.authorization.is_granted() {
            info!("Overlay permission gained");
        } else {
            self.authorization.request_authorization()?;
        }
        Ok(self.authorization.state())
    }

    /// Deliver the result of a permission request.
    ///
    /// Results with an unexpected request code are ignored.
    pub fn on_authorization_result(&mut self, request_code: u32) -> Option<AuthorizationState> {
        let state = self.authorization.on_authorization_result(request_code)?;
        let notice = if state.is_granted() {
            Notice::new(
                NoticeKind::PermissionGranted,
                &self.config.content.permission_granted,
            )
        } else {
            Notice::new(
                NoticeKind::PermissionDenied,
                &self.config.content.permission_denied,
            )
        };
        self.notify(notice);
        Some(state)
    }

    /// Open a presentation on the secondary display.
    ///
    /// Fails with [`Error::SessionActive`] while another session is live and
    /// with [`Error::IllegalState`] once the primary context is gone.
    /// Missing authorization and missing routes are reported to the primary
    /// context as notices and returned as [`Error::PermissionDenied`] and
    /// [`Error::NoRoute`]. Any other failure is returned as is; in every
    /// failure case no session is stored and no surface is left open.
    pub fn show(&mut self) -> Result<SessionId> {
        self.reap();
        if let Some(session) = &self.current {
            warn!("Show requested while session {} is live", session.id());
            return Err(Error::SessionActive(session.id()));
        }
        if self.primary.upgrade().is_none() {
            warn!("Show refused: primary context is gone");
            return Err(Error::IllegalState("primary context is gone".to_string()));
        }

        if !self.authorization.is_granted() {
            warn!("Show refused: overlay permission not granted");
            self.notify(Notice::new(
                NoticeKind::PermissionDenied,
                &self.config.content.permission_denied,
            ));
            return Err(Error::PermissionDenied);
        }

        let route = match self.resolver.resolve(self.config.routing.capability) {
            Ok(route) => route,
            Err(Error::NoRoute) => {
                self.notify(Notice::new(
                    NoticeKind::Unsupported,
                    &self.config.content.unsupported,
                ));
                return Err(Error::NoRoute);
            }
            Err(e) => return Err(e),
        };
        let display = route.presentation_display.ok_or(Error::NoRoute)?;

        let mut session = PresentationSession::new(
            self.config.platform.version,
            Arc::clone(&self.surfaces),
            Weak::clone(&self.primary),
            self.config.content.clone(),
        );
        if let Err(e) = Self::start(&mut session, display) {
            error!("Failed to start presentation session: {}", e);
            session.dismiss();
            return Err(e);
        }

        let id = session.id();
        info!("Presentation session {} showing", id);
        self.current = Some(session);
        Ok(id)
    }

    fn start(session: &mut PresentationSession, display: Arc<Display>) -> Result<()> {
        session.create(Some(display))?;
        session.bind_content()?;
        session.show()
    }

    /// Dismiss the current session, if any.
    pub fn close(&mut self) {
        match self.current.take() {
            Some(mut session) => {
                session.dismiss();
                info!("Presentation session {} closed", session.id());
            }
            None => debug!("Close requested with no session"),
        }
    }

    /// Raise an event on the current session.
    pub fn dispatch(&mut self, event: SurfaceEvent) -> Result<EventOutcome> {
        let session = self.live_session()?;
        let outcome = session.emit(event);
        self.reap();
        outcome
    }

    /// Activate a control on the current session's surface.
    pub fn press_control(&mut self, name: &str) -> Result<EventOutcome> {
        let session = self.live_session()?;
        let outcome = session.press_control(name);
        self.reap();
        outcome
    }

    /// Hook for the primary context's destruction.
    pub fn on_primary_destroyed(&mut self) {
        if self.current.is_some() {
            info!("Primary context destroyed, closing presentation");
        }
        self.close();
    }

    fn live_session(&mut self) -> Result<&mut PresentationSession> {
        self.current
            .as_mut()
            .filter(|session| session.state().is_live())
            .ok_or_else(|| Error::IllegalState("no live presentation session".to_string()))
    }

    /// Close a session whose primary context is gone and forget one that
    /// dismissed itself from the secondary surface.
    fn reap(&mut self) {
        if self.current.is_some() && self.primary.upgrade().is_none() {
            info!("Primary context gone, closing presentation");
            self.close();
            return;
        }

        if self
            .current
            .as_ref()
            .is_some_and(|session| session.state() == SessionState::Dismissed)
        {
            if let Some(session) = self.current.take() {
                debug!("Cleared dismissed session {}", session.id());
            }
        }
    }

    fn notify(&self, notice: Notice) {
        match self.primary.upgrade() {
            Some(primary) => primary.show_notice(notice),
            None => debug!("Dropping notice '{}': primary context gone", notice),
        }
    }
}

impl Drop for PresentationController {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::primary_handle;
    use crate::simulated::{RecordingPrimary, SimulatedPlatform};
    use presentation_core::{DisplayId, OverlayType, PlatformVersion, Route, RouteCapability};

    fn controller(
        platform: &Arc<SimulatedPlatform>,
        primary: &Arc<RecordingPrimary>,
    ) -> PresentationController {
        PresentationController::new(
            PresentationConfig::default(),
            PlatformServices::from_platform(Arc::clone(platform)),
            primary_handle(primary),
        )
    }

    fn granted_platform() -> Arc<SimulatedPlatform> {
        let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(34));
        platform.set_overlay_permission(true);
        Arc::new(platform)
    }

    #[test]
    fn test_show_success() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        let id = controller.show().unwrap();
        let info = controller.current_session().unwrap();
        assert_eq!(info.id, id);
        assert_eq!(info.state, SessionState::Showing);
        assert!(controller.has_live_session());
        assert_eq!(platform.visible_surface_count(), 1);
        assert!(primary.notices().is_empty());
    }

    #[test]
    fn test_show_without_permission() {
        let platform = Arc::new(SimulatedPlatform::with_secondary_display(
            PlatformVersion::new(34),
        ));
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        assert!(matches!(controller.show(), Err(Error::PermissionDenied)));
        assert!(controller.current_session().is_none());
        assert_eq!(platform.opened_total(), 0);
        assert_eq!(primary.notices()[0].kind, NoticeKind::PermissionDenied);
    }

    #[test]
    fn test_show_without_route() {
        let platform = Arc::new(SimulatedPlatform::new(PlatformVersion::new(34)));
        platform.set_overlay_permission(true);
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        assert!(matches!(controller.show(), Err(Error::NoRoute)));
        assert!(controller.current_session().is_none());
        assert_eq!(platform.opened_total(), 0);

        let notices = primary.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Unsupported);
    }

    #[test]
    fn test_show_route_without_display() {
        let platform = Arc::new(SimulatedPlatform::new(PlatformVersion::new(34)));
        platform.set_overlay_permission(true);
        platform.add_route(Route::new("Speaker", vec![RouteCapability::LiveAudio]).selected());
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        assert!(matches!(controller.show(), Err(Error::NoRoute)));
        assert!(controller.current_session().is_none());
    }

    #[test]
    fn test_show_invalid_display_not_stored() {
        let platform = Arc::new(SimulatedPlatform::new(PlatformVersion::new(34)));
        platform.set_overlay_permission(true);
        let mirror =
            platform.add_display(Display::without_presentation(DisplayId::new(3), "Mirror"));
        platform.add_route(
            Route::new("Mirror", vec![RouteCapability::LiveAudio])
                .with_display(mirror)
                .selected(),
        );
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        assert!(matches!(controller.show(), Err(Error::InvalidDisplay(_))));
        assert!(controller.current_session().is_none());
        assert_eq!(platform.open_surface_count(), 0);
    }

    #[test]
    fn test_show_rollback_on_rejected_surface() {
        let platform = granted_platform();
        platform.set_reject_visibility(true);
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        assert!(matches!(controller.show(), Err(Error::SurfaceRejected(_))));
        assert!(controller.current_session().is_none());
        assert_eq!(platform.opened_total(), 1);
        assert_eq!(platform.open_surface_count(), 0);
    }

    #[test]
    fn test_show_while_live() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        let id = controller.show().unwrap();
        let err = controller.show().unwrap_err();
        assert!(matches!(err, Error::SessionActive(active) if active == id));
        assert_eq!(controller.current_session().unwrap().id, id);
        assert_eq!(platform.opened_total(), 1);
    }

    #[test]
    fn test_close() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        controller.show().unwrap();
        controller.close();
        assert!(controller.current_session().is_none());
        assert_eq!(platform.open_surface_count(), 0);
    }

    #[test]
    fn test_close_without_session() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        controller.close();
        controller.close();
        assert!(controller.current_session().is_none());
    }

    #[test]
    fn test_show_after_close() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        let first = controller.show().unwrap();
        controller.close();
        let second = controller.show().unwrap();
        assert_ne!(first, second);
        assert_eq!(platform.open_surface_count(), 1);
    }

    #[test]
    fn test_dispatch_request_dialog() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.show().unwrap();

        let outcome = controller.dispatch(SurfaceEvent::RequestDialog).unwrap();
        assert_eq!(outcome, EventOutcome::Delivered);
        assert_eq!(primary.dialog_count(), 1);
        assert!(controller.has_live_session());
    }

    #[test]
    fn test_dispatch_dismiss_clears_current() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.show().unwrap();

        let outcome = controller.dispatch(SurfaceEvent::DismissSession).unwrap();
        assert_eq!(outcome, EventOutcome::DismissRequested);
        assert!(controller.current_session().is_none());
        assert_eq!(platform.open_surface_count(), 0);
    }

    #[test]
    fn test_dispatch_without_session() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        let err = controller.dispatch(SurfaceEvent::RequestDialog).unwrap_err();
        assert!(err.is_lifecycle_defect());
    }

    #[test]
    fn test_press_control_dismiss() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.show().unwrap();

        controller.press_control("dismiss").unwrap();
        assert!(!controller.has_live_session());
        assert!(controller.show().is_ok());
    }

    #[test]
    fn test_check_authorization_requests_permission() {
        let platform = Arc::new(SimulatedPlatform::with_secondary_display(
            PlatformVersion::new(34),
        ));
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        let state = controller.check_authorization().unwrap();
        assert_eq!(state, AuthorizationState::Unknown);
        assert_eq!(platform.launched_requests().len(), 1);

        platform.set_overlay_permission(true);
        assert_eq!(
            controller.on_authorization_result(100),
            Some(AuthorizationState::Granted)
        );
        assert_eq!(primary.notices()[0].kind, NoticeKind::PermissionGranted);
        assert!(controller.show().is_ok());
    }

    #[test]
    fn test_check_authorization_already_granted() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);

        let state = controller.check_authorization().unwrap();
        assert_eq!(state, AuthorizationState::Granted);
        assert!(platform.launched_requests().is_empty());
    }

    #[test]
    fn test_authorization_result_denied_notice() {
        let platform = Arc::new(SimulatedPlatform::with_secondary_display(
            PlatformVersion::new(34),
        ));
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.check_authorization().unwrap();

        assert_eq!(
            controller.on_authorization_result(100),
            Some(AuthorizationState::Denied)
        );
        assert_eq!(primary.notices()[0].kind, NoticeKind::PermissionDenied);
    }

    #[test]
    fn test_authorization_result_unknown_code() {
        let platform = Arc::new(SimulatedPlatform::with_secondary_display(
            PlatformVersion::new(34),
        ));
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.check_authorization().unwrap();

        assert_eq!(controller.on_authorization_result(1), None);
        assert!(primary.notices().is_empty());
    }

    #[test]
    fn test_show_after_primary_dropped() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.show().unwrap();

        drop(primary);
        let err = controller.show().unwrap_err();
        assert!(err.is_lifecycle_defect());
        assert!(controller.current_session().is_none());
        assert_eq!(platform.open_surface_count(), 0);
        assert_eq!(platform.opened_total(), 1);
    }

    #[test]
    fn test_primary_destroyed_closes_session() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.show().unwrap();

        drop(primary);
        controller.on_primary_destroyed();
        assert!(controller.current_session().is_none());
        assert_eq!(platform.open_surface_count(), 0);
    }

    #[test]
    fn test_drop_controller_closes_session() {
        let platform = granted_platform();
        let primary = Arc::new(RecordingPrimary::new());
        let mut controller = controller(&platform, &primary);
        controller.show().unwrap();

        drop(controller);
        assert_eq!(platform.open_surface_count(), 0);
    }

    #[test]
    fn test_legacy_platform_needs_no_permission() {
        let platform = Arc::new(SimulatedPlatform::with_secondary_display(
            PlatformVersion::new(22),
        ));
        let primary = Arc::new(RecordingPrimary::new());
        let mut config = PresentationConfig::default();
        config.platform.version = PlatformVersion::new(22);
        let mut controller = PresentationController::new(
            config,
            PlatformServices::from_platform(Arc::clone(&platform)),
            primary_handle(&primary),
        );

        controller.show().unwrap();
        assert_eq!(platform.open_surfaces()[0].overlay, OverlayType::SystemAlert);
    }
}
