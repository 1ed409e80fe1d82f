//! Cross-surface event routing.
//!
//! Controls on the secondary surface raise [`SurfaceEvent`]s. The bridge maps
//! each event to a handler registered when content is bound. Handlers reach
//! the primary context only through a `Weak` handle, so a live presentation
//! never keeps the primary window alive.

use std::collections::HashMap;
use std::sync::Weak;

use tracing::{debug, warn};

use presentation_core::{ContentSettings, Error, Notice, NoticeKind, Result, SurfaceEvent};

use crate::platform::{DialogRequest, PrimaryContext};

/// What happened when an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The primary context received the event
    Delivered,
    /// The session asked to be dismissed
    DismissRequested,
    /// The primary context no longer exists
    PrimaryGone,
}

type Handler = Box<dyn Fn() -> EventOutcome + Send + Sync>;

/// Registered callbacks keyed by event.
#[derive(Default)]
pub struct CrossSurfaceEventBridge {
    handlers: HashMap<SurfaceEvent, Handler>,
}

impl CrossSurfaceEventBridge {
    /// Create an empty bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for an event, replacing any previous one.
    pub fn register(
        &mut self,
        event: SurfaceEvent,
        handler: impl Fn() -> EventOutcome + Send + Sync + 'static,
    ) {
        if self.handlers.insert(event, Box::new(handler)).is_some() {
            debug!("Replaced handler for {}", event);
        }
    }

    /// Check whether an event has a handler.
    pub fn is_registered(&self, event: SurfaceEvent) -> bool {
        self.handlers.contains_key(&event)
    }

    /// Invoke the handler registered for `event`.
    pub fn emit(&self, event: SurfaceEvent) -> Result<EventOutcome> {
        let handler = self
            .handlers
            .get(&event)
            .ok_or_else(|| Error::UnhandledEvent(event.name().to_string()))?;

        let outcome = handler();
        debug!("Emitted {}: {:?}", event, outcome);
        Ok(outcome)
    }

    /// Drop all handlers.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Wire the default handlers: `request-dialog` shows a dialog on the
    /// primary context whose confirmation posts an acknowledgement notice,
    /// `dismiss-session` asks the owning session to dismiss itself.
    pub fn wire(&mut self, primary: Weak<dyn PrimaryContext>, settings: &ContentSettings) {
        let settings = settings.clone();
        self.register(SurfaceEvent::RequestDialog, move || {
            request_dialog(&primary, &settings)
        });
        self.register(SurfaceEvent::DismissSession, || EventOutcome::DismissRequested);
    }
}

fn request_dialog(primary: &Weak<dyn PrimaryContext>, settings: &ContentSettings) -> EventOutcome {
    let Some(context) = primary.upgrade() else {
        warn!("Dialog requested but the primary context is gone");
        return EventOutcome::PrimaryGone;
    };

    let owner = Weak::clone(primary);
    let acknowledgement = Notice::new(NoticeKind::DialogAcknowledged, &settings.acknowledgement);
    let dialog = DialogRequest::new(
        &settings.dialog_title,
        &settings.dialog_message,
        &settings.confirm_label,
    )
    .on_confirm(move || {
        if let Some(context) = owner.upgrade() {
            context.show_notice(acknowledgement);
        }
    });

    context.show_dialog(dialog);
    EventOutcome::Delivered
}

impl std::fmt::Debug for CrossSurfaceEventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossSurfaceEventBridge")
            .field("events", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
