//! In-memory platform.
//!
//! [`SimulatedPlatform`] implements every platform seam against plain data so
//! the lifecycle can be exercised without a window system. Its surface host
//! enforces the same overlay policy a real window manager does: it refuses a
//! window type that does not match its platform version.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use presentation_core::{
    overlay_type_for, Display, DisplayId, Error, Notice, OverlayType, PlatformVersion, Result,
    Route, RouteCapability,
};

use crate::authorization::PermissionRequest;
use crate::platform::{
    DialogRequest, OverlayPermissionSystem, PrimaryContext, RouteProvider, SurfaceHost, SurfaceId,
};

/// Display entry of a [`PlatformSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySpec {
    /// Display identifier (0 is the built-in display)
    pub id: u32,
    /// Display name
    pub name: String,
    /// Whether the display can host a presentation
    #[serde(default = "default_true")]
    pub presentation: bool,
}

/// Route entry of a [`PlatformSpec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Route name
    pub name: String,
    /// Capabilities offered by the route
    #[serde(default)]
    pub capabilities: Vec<RouteCapability>,
    /// Whether the route is selected
    #[serde(default)]
    pub selected: bool,
    /// Identifier of the presentation display
    #[serde(default)]
    pub display: Option<u32>,
}

/// Declarative description of a simulated platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSpec {
    /// Displays, built-in first
    pub displays: Vec<DisplaySpec>,
    /// Output routes
    pub routes: Vec<RouteSpec>,
    /// Whether overlay drawing is already permitted
    pub overlay_permission: bool,
}

fn default_true() -> bool {
    true
}

/// Window opened on the simulated host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceRecord {
    /// Surface identifier
    pub id: SurfaceId,
    /// Display the window lives on
    pub display: DisplayId,
    /// Window type
    pub overlay: OverlayType,
    /// Whether the window is visible
    pub visible: bool,
}

#[derive(Default)]
struct PlatformState {
    displays: Vec<Arc<Display>>,
    routes: Vec<Route>,
    can_draw_overlays: bool,
    launched: Vec<PermissionRequest>,
    surfaces: HashMap<SurfaceId, SurfaceRecord>,
    next_surface: u64,
    opened_total: usize,
    reject_visibility: bool,
}

/// In-memory implementation of the platform seams.
pub struct SimulatedPlatform {
    version: PlatformVersion,
    state: Mutex<PlatformState>,
}

impl SimulatedPlatform {
    /// Create a platform with no displays, no routes and no overlay permission.
    pub fn new(version: PlatformVersion) -> Self {
        Self {
            version,
            state: Mutex::new(PlatformState::default()),
        }
    }

    /// Create a platform with a built-in display and a selected live-audio
    /// route presenting on display 1.
    pub fn with_secondary_display(version: PlatformVersion) -> Self {
        let platform = Self::new(version);
        platform.add_display(Display::without_presentation(DisplayId::DEFAULT, "Built-in"));
        let external = platform.add_display(Display::new(DisplayId::new(1), "HDMI"));
        platform.add_route(
            Route::new("HDMI", vec![RouteCapability::LiveAudio])
                .with_display(external)
                .selected(),
        );
        platform
    }

    /// Build a platform from its declarative description.
    pub fn from_spec(version: PlatformVersion, spec: &PlatformSpec) -> Result<Self> {
        let platform = Self::new(version);
        for display in &spec.displays {
            let id = DisplayId::new(display.id);
            platform.add_display(if display.presentation {
                Display::new(id, &display.name)
            } else {
                Display::without_presentation(id, &display.name)
            });
        }

        for route in &spec.routes {
            let mut built = Route::new(&route.name, route.capabilities.clone());
            built.selected = route.selected;
            if let Some(id) = route.display {
                let display = platform.display(DisplayId::new(id)).ok_or_else(|| {
                    Error::Config(format!(
                        "route '{}' references unknown display {}",
                        route.name, id
                    ))
                })?;
                built = built.with_display(display);
            }
            platform.add_route(built);
        }

        platform.set_overlay_permission(spec.overlay_permission);
        Ok(platform)
    }

    fn state(&self) -> MutexGuard<'_, PlatformState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Plug in a display.
    pub fn add_display(&self, display: Display) -> Arc<Display> {
        let display = Arc::new(display);
        self.state().displays.push(Arc::clone(&display));
        display
    }

    /// Find a display by identifier.
    pub fn display(&self, id: DisplayId) -> Option<Arc<Display>> {
        self.state()
            .displays
            .iter()
            .find(|display| display.id == id)
            .cloned()
    }

    /// Publish a route.
    pub fn add_route(&self, route: Route) {
        self.state().routes.push(route);
    }

    /// Remove every route.
    pub fn clear_routes(&self) {
        self.state().routes.clear();
    }

    /// Grant or revoke the overlay permission.
    pub fn set_overlay_permission(&self, granted: bool) {
        self.state().can_draw_overlays = granted;
    }

    /// Make every visibility change fail.
    pub fn set_reject_visibility(&self, reject: bool) {
        self.state().reject_visibility = reject;
    }

    /// Permission requests launched so far.
    pub fn launched_requests(&self) -> Vec<PermissionRequest> {
        self.state().launched.clone()
    }

    /// Windows currently open, by surface identifier.
    pub fn open_surfaces(&self) -> Vec<SurfaceRecord> {
        let mut surfaces: Vec<SurfaceRecord> = self.state().surfaces.values().cloned().collect();
        surfaces.sort_by_key(|surface| surface.id.get());
        surfaces
    }

    /// Number of windows currently open.
    pub fn open_surface_count(&self) -> usize {
        self.state().surfaces.len()
    }

    /// Number of windows currently visible.
    pub fn visible_surface_count(&self) -> usize {
        self.state()
            .surfaces
            .values()
            .filter(|surface| surface.visible)
            .count()
    }

    /// Number of windows ever opened.
    pub fn opened_total(&self) -> usize {
        self.state().opened_total
    }
}

impl RouteProvider for SimulatedPlatform {
    fn routes(&self) -> Vec<Route> {
        self.state().routes.clone()
    }

    fn displays(&self) -> Vec<Arc<Display>> {
        self.state().displays.clone()
    }
}

impl OverlayPermissionSystem for SimulatedPlatform {
    fn can_draw_overlays(&self) -> bool {
        self.state().can_draw_overlays
    }

    fn launch_settings(&self, request: &PermissionRequest) -> Result<()> {
        debug!("Launching overlay settings for {}", request.settings_uri());
        self.state().launched.push(request.clone());
        Ok(())
    }
}

impl SurfaceHost for SimulatedPlatform {
    fn open(&self, display: &Display, overlay: OverlayType) -> Result<SurfaceId> {
        let expected = overlay_type_for(self.version);
        if overlay != expected {
            return Err(Error::SurfaceRejected(format!(
                "{} windows are not accepted on {} (expected {})",
                overlay, self.version, expected
            )));
        }

        let mut state = self.state();
        if !state.displays.iter().any(|known| known.id == display.id) {
            return Err(Error::InvalidDisplay(format!(
                "display {} is not attached",
                display.id
            )));
        }

        state.next_surface += 1;
        let id = SurfaceId::new(state.next_surface);
        state.surfaces.insert(
            id,
            SurfaceRecord {
                id,
                display: display.id,
                overlay,
                visible: false,
            },
        );
        state.opened_total += 1;
        Ok(id)
    }

    fn set_visible(&self, surface: SurfaceId, visible: bool) -> Result<()> {
        let mut state = self.state();
        if state.reject_visibility {
            return Err(Error::SurfaceRejected(format!(
                "{surface} cannot change visibility"
            )));
        }
        let record = state
            .surfaces
            .get_mut(&surface)
            .ok_or_else(|| Error::SurfaceRejected(format!("{surface} is not open")))?;
        record.visible = visible;
        Ok(())
    }

    fn close(&self, surface: SurfaceId) {
        if self.state().surfaces.remove(&surface).is_none() {
            debug!("Close of unknown {}", surface);
        }
    }
}

/// Primary context that records what it is asked to display.
#[derive(Default)]
pub struct RecordingPrimary {
    dialogs: Mutex<VecDeque<DialogRequest>>,
    dialogs_shown: Mutex<usize>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingPrimary {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dialogs shown so far.
    pub fn dialog_count(&self) -> usize {
        *lock(&self.dialogs_shown)
    }

    /// Dialogs still awaiting confirmation.
    pub fn pending_dialogs(&self) -> usize {
        lock(&self.dialogs).len()
    }

    /// Confirm the oldest open dialog. Returns false when none is open.
    pub fn confirm_dialog(&self) -> bool {
        // Release the lock before the callback posts its notice
        let dialog = lock(&self.dialogs).pop_front();
        match dialog {
            Some(dialog) => {
                dialog.confirm();
                true
            }
            None => false,
        }
    }

    /// Notices shown so far.
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }
}

impl PrimaryContext for RecordingPrimary {
    fn show_dialog(&self, dialog: DialogRequest) {
        *lock(&self.dialogs_shown) += 1;
        lock(&self.dialogs).push_back(dialog);
    }

    fn show_notice(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
