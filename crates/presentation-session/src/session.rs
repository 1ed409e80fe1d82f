//! Presentation session state machine.

use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use presentation_core::{
    overlay_type_for, ContentSettings, Display, Error, OverlayType, PlatformVersion, Result,
    SessionId, SessionInfo, SessionState, SurfaceEvent,
};

use crate::bridge::{CrossSurfaceEventBridge, EventOutcome};
use crate::content::ContentRoot;
use crate::platform::{PrimaryContext, SurfaceHost, SurfaceId};

/// One secondary-surface instance.
///
/// Lifecycle: `Uninitialized → Created → ContentBound → Showing → Dismissed`.
/// A session owns its surface and content tree and releases both on
/// [`PresentationSession::dismiss`] or when dropped. The display is borrowed
/// from the platform for as long as the session is bound to it.
pub struct PresentationSession {
    /// Session identifier
    id: SessionId,

    /// Current lifecycle state
    state: SessionState,

    /// Platform version the overlay type is derived from
    version: PlatformVersion,

    /// Overlay window type, fixed at create time
    overlay_type: Option<OverlayType>,

    /// Display the surface lives on
    display: Option<Arc<Display>>,

    /// Window opened on the display
    surface: Option<SurfaceId>,

    /// Visual tree, present once content is bound
    content: Option<ContentRoot>,

    /// Event routing for local controls
    bridge: CrossSurfaceEventBridge,

    /// Window system
    host: Arc<dyn SurfaceHost>,

    /// Non-owning handle to the primary window
    primary: Weak<dyn PrimaryContext>,

    /// Layout and texts
    settings: ContentSettings,
}

impl PresentationSession {
    /// Create an uninitialized session.
    pub fn new(
        version: PlatformVersion,
        host: Arc<dyn SurfaceHost>,
        primary: Weak<dyn PrimaryContext>,
        settings: ContentSettings,
    ) -> Self {
        Self {
            id: SessionId::new(),
            state: SessionState::Uninitialized,
            version,
            overlay_type: None,
            display: None,
            surface: None,
            content: None,
            bridge: CrossSurfaceEventBridge::new(),
            host,
            primary,
            settings,
        }
    }

    /// Get the session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Get the overlay window type, once created.
    pub fn overlay_type(&self) -> Option<OverlayType> {
        self.overlay_type
    }

    /// Get the bound display.
    pub fn display(&self) -> Option<&Arc<Display>> {
        self.display.as_ref()
    }

    /// Get the content tree, once bound.
    pub fn content(&self) -> Option<&ContentRoot> {
        self.content.as_ref()
    }

    /// Snapshot of the session.
    pub fn info(&self) -> SessionInfo {
        SessionInfo::new(
            self.id,
            self.state,
            self.display.as_ref().map(|display| display.id),
            self.overlay_type,
        )
    }

    /// Bind the session to a display and open its overlay window.
    ///
    /// The overlay window type is chosen from the platform version with
    /// [`overlay_type_for`].
    pub fn create(&mut self, display: Option<Arc<Display>>) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(Error::IllegalState(format!(
                "create called in state {:?}",
                self.state
            )));
        }

        let display =
            display.ok_or_else(|| Error::InvalidDisplay("no display handle".to_string()))?;
        if !display.presentation_capable {
            return Err(Error::InvalidDisplay(format!(
                "display {} ('{}') cannot host a presentation",
                display.id, display.name
            )));
        }

        let overlay_type = overlay_type_for(self.version);
        let display_id = display.id;
        debug!(
            "Opening {} window on display {} ({})",
            overlay_type, display_id, self.version
        );
        let surface = self.host.open(&display, overlay_type)?;

        self.overlay_type = Some(overlay_type);
        self.surface = Some(surface);
        self.display = Some(display);
        self.transition(SessionState::Created);
        Ok(())
    }

    /// Build the content tree and wire its controls into the event bridge.
    ///
    /// Valid exactly once, right after [`PresentationSession::create`].
    pub fn bind_content(&mut self) -> Result<()> {
        match self.state {
            SessionState::Created => {}
            SessionState::Uninitialized => {
                return Err(Error::IllegalState(
                    "bind_content called before create".to_string(),
                ))
            }
            state => {
                return Err(Error::IllegalState(format!(
                    "content already bound (state {state:?})"
                )))
            }
        }

        let content = ContentRoot::build(&self.settings);
        self.bridge.wire(Weak::clone(&self.primary), &self.settings);
        debug!(
            "Bound {} control(s) for session {}",
            content.controls().len(),
            self.id
        );
        self.content = Some(content);
        self.transition(SessionState::ContentBound);
        Ok(())
    }

    /// Make the surface visible on its display. No-op when already showing.
    pub fn show(&mut self) -> Result<()> {
        match self.state {
            SessionState::Showing => Ok(()),
            SessionState::ContentBound => {
                let surface = self.surface.ok_or_else(|| {
                    Error::IllegalState("content bound without a surface".to_string())
                })?;
                self.host.set_visible(surface, true)?;
                self.transition(SessionState::Showing);
                Ok(())
            }
            state => Err(Error::IllegalState(format!(
                "show called in state {state:?}"
            ))),
        }
    }

    /// Tear the surface down and release the display.
    ///
    /// Idempotent: dismissing an already dismissed session does nothing.
    pub fn dismiss(&mut self) {
        if self.state == SessionState::Dismissed {
            debug!("Session {} already dismissed", self.id);
            return;
        }

        if let Some(surface) = self.surface.take() {
            self.host.close(surface);
        }
        self.bridge.clear();
        self.content = None;
        self.display = None;
        self.transition(SessionState::Dismissed);
    }

    /// Raise an event as if one of the local controls fired it.
    ///
    /// A `dismiss-session` event dismisses the session before returning, and
    /// so does any event that finds the primary context gone.
    pub fn emit(&mut self, event: SurfaceEvent) -> Result<EventOutcome> {
        if !matches!(
            self.state,
            SessionState::ContentBound | SessionState::Showing
        ) {
            return Err(Error::IllegalState(format!(
                "{} emitted in state {:?}",
                event, self.state
            )));
        }

        let outcome = self.bridge.emit(event)?;
        match outcome {
            EventOutcome::DismissRequested => {
                info!("Session {} dismissed from the secondary surface", self.id);
                self.dismiss();
            }
            EventOutcome::PrimaryGone => {
                warn!("Primary context of session {} is gone, dismissing", self.id);
                self.dismiss();
            }
            EventOutcome::Delivered => {}
        }
        Ok(outcome)
    }

    /// Activate a local control by name.
    pub fn press_control(&mut self, name: &str) -> Result<EventOutcome> {
        let event = self
            .content
            .as_ref()
            .and_then(|content| content.control(name))
            .map(|control| control.event)
            .ok_or_else(|| Error::UnknownControl(name.to_string()))?;
        self.emit(event)
    }

    fn transition(&mut self, to: SessionState) {
        debug_assert!(to > self.state, "session states only move forward");
        info!(
            "Session state changed: id={}, {:?} → {:?}",
            self.id, self.state, to
        );
        self.state = to;
    }
}

impl Drop for PresentationSession {
    fn drop(&mut self) {
        if self.state.is_live() {
            warn!(
                "Session {} dropped in state {:?}, releasing surface",
                self.id, self.state
            );
            self.dismiss();
        }
    }
}

impl std::fmt::Debug for PresentationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("overlay_type", &self.overlay_type)
            .field("display", &self.display.as_ref().map(|d| d.id))
            .field("surface", &self.surface)
            .finish()
    }
}
