//! End-to-end presentation lifecycle against the simulated platform.

use std::sync::Arc;

use presentation_core::{
    Error, NoticeKind, OverlayType, PlatformVersion, PresentationConfig, ResolveStrategy,
    SessionState, SurfaceEvent,
};
use presentation_session::{
    primary_handle, EventOutcome, PlatformServices, PresentationController, RecordingPrimary,
    SimulatedPlatform,
};

fn setup(
    platform: SimulatedPlatform,
    config: PresentationConfig,
) -> (Arc<SimulatedPlatform>, Arc<RecordingPrimary>, PresentationController) {
    let platform = Arc::new(platform);
    let primary = Arc::new(RecordingPrimary::new());
    let controller = PresentationController::new(
        config,
        PlatformServices::from_platform(Arc::clone(&platform)),
        primary_handle(&primary),
    );
    (platform, primary, controller)
}

#[test]
fn test_show_dialog_then_dismiss_from_secondary_surface() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(34));
    platform.set_overlay_permission(true);
    let (platform, primary, mut controller) = setup(platform, PresentationConfig::default());

    controller.show().expect("show should succeed");
    assert_eq!(
        controller.current_session().map(|info| info.state),
        Some(SessionState::Showing)
    );

    // Secondary surface asks for a dialog on the primary window
    let outcome = controller.press_control("show_dialog").unwrap();
    assert_eq!(outcome, EventOutcome::Delivered);
    assert_eq!(primary.dialog_count(), 1);

    // Confirming it posts exactly one acknowledgement back on the primary
    assert!(primary.confirm_dialog());
    let notices = primary.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::DialogAcknowledged);

    // Dismiss from within the secondary surface
    controller.press_control("dismiss").unwrap();
    assert!(controller.current_session().is_none());
    assert_eq!(platform.open_surface_count(), 0);
}

#[test]
fn test_no_route_leaves_no_session() {
    let platform = SimulatedPlatform::new(PlatformVersion::new(34));
    platform.set_overlay_permission(true);
    let (platform, primary, mut controller) = setup(platform, PresentationConfig::default());

    assert!(matches!(controller.show(), Err(Error::NoRoute)));
    assert!(controller.current_session().is_none());
    assert_eq!(platform.opened_total(), 0);
    assert_eq!(primary.notices()[0].kind, NoticeKind::Unsupported);
}

#[test]
fn test_route_disappears_between_shows() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(34));
    platform.set_overlay_permission(true);
    let (platform, _primary, mut controller) = setup(platform, PresentationConfig::default());

    controller.show().unwrap();
    controller.close();

    platform.clear_routes();
    assert!(matches!(controller.show(), Err(Error::NoRoute)));
}

#[test]
fn test_permission_flow_then_show() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(30));
    let mut config = PresentationConfig::default();
    config.platform.version = PlatformVersion::new(30);
    config.authorization.request_code = 7;
    let (platform, primary, mut controller) = setup(platform, config);

    controller.check_authorization().unwrap();
    assert!(matches!(controller.show(), Err(Error::PermissionDenied)));

    // User grants the permission in system settings
    platform.set_overlay_permission(true);
    assert!(controller.on_authorization_result(100).is_none());
    assert!(controller.on_authorization_result(7).is_some());

    controller.show().unwrap();
    assert_eq!(
        controller.current_session().unwrap().overlay_type,
        Some(OverlayType::ApplicationOverlay)
    );

    let kinds: Vec<NoticeKind> = primary.notices().iter().map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![NoticeKind::PermissionDenied, NoticeKind::PermissionGranted]
    );
}

#[test]
fn test_legacy_platform_uses_system_alert() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(24));
    platform.set_overlay_permission(true);
    let mut config = PresentationConfig::default();
    config.platform.version = PlatformVersion::new(24);
    let (platform, _primary, mut controller) = setup(platform, config);

    controller.show().unwrap();
    assert_eq!(platform.open_surfaces()[0].overlay, OverlayType::SystemAlert);
}

#[test]
fn test_display_enumeration_strategy() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(34));
    platform.set_overlay_permission(true);
    platform.clear_routes();
    let mut config = PresentationConfig::default();
    config.routing.strategy = ResolveStrategy::DisplayEnumeration;
    let (_platform, _primary, mut controller) = setup(platform, config);

    controller.show().unwrap();
    assert_eq!(
        controller.current_session().unwrap().display.map(|id| id.get()),
        Some(1)
    );
}

#[test]
fn test_primary_destroyed_with_live_session() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(34));
    platform.set_overlay_permission(true);
    let (platform, primary, mut controller) = setup(platform, PresentationConfig::default());

    controller.show().unwrap();
    drop(primary);

    // The surface goes away with its owner on the next event
    assert_eq!(
        controller.dispatch(SurfaceEvent::RequestDialog).unwrap(),
        EventOutcome::PrimaryGone
    );
    assert!(!controller.has_live_session());
    assert!(controller.current_session().is_none());
    assert_eq!(platform.open_surface_count(), 0);
    assert_eq!(platform.visible_surface_count(), 0);

    // No new presentation for an owner that no longer exists
    assert!(matches!(controller.show(), Err(Error::IllegalState(_))));
    assert_eq!(platform.open_surface_count(), 0);

    controller.on_primary_destroyed();
    assert_eq!(platform.open_surface_count(), 0);
}

#[test]
fn test_session_snapshot_serializes() {
    let platform = SimulatedPlatform::with_secondary_display(PlatformVersion::new(34));
    platform.set_overlay_permission(true);
    let (_platform, _primary, mut controller) = setup(platform, PresentationConfig::default());

    controller.show().unwrap();
    let info = controller.current_session().unwrap();
    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["state"], "showing");
    assert_eq!(json["overlay_type"], "application_overlay");
    assert_eq!(json["display"], 1);
}
