//! Content tree of the secondary surface.

use presentation_core::{ContentSettings, SurfaceEvent};

/// A user-activatable control on the secondary surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalControl {
    /// Control name
    pub name: String,
    /// Event raised when the control is activated
    pub event: SurfaceEvent,
}

impl LocalControl {
    /// Create a control.
    pub fn new(name: impl Into<String>, event: SurfaceEvent) -> Self {
        Self {
            name: name.into(),
            event,
        }
    }
}

/// Root of the secondary surface's visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRoot {
    controls: Vec<LocalControl>,
}

impl ContentRoot {
    /// Build the presentation layout: a dialog button and a dismiss button.
    pub fn build(settings: &ContentSettings) -> Self {
        Self {
            controls: vec![
                LocalControl::new(&settings.dialog_control, SurfaceEvent::RequestDialog),
                LocalControl::new(&settings.dismiss_control, SurfaceEvent::DismissSession),
            ],
        }
    }

    /// Find a control by name.
    pub fn control(&self, name: &str) -> Option<&LocalControl> {
        self.controls.iter().find(|control| control.name == name)
    }

    /// All controls, in layout order.
    pub fn controls(&self) -> &[LocalControl] {
        &self.controls
    }
}
