//! Scenario files.
//!
//! A scenario bundles a [`PresentationConfig`], a simulated platform and the
//! list of user actions to replay:
//!
//! ```yaml
//! config:
//!   platform:
//!     version: 34
//! platform:
//!   displays:
//!     - { id: 0, name: Built-in, presentation: false }
//!     - { id: 1, name: HDMI }
//!   routes:
//!     - { name: HDMI, capabilities: [live_audio], selected: true, display: 1 }
//! steps:
//!   - action: show
//!   - action: press
//!     control: show_dialog
//!   - action: confirm_dialog
//!   - action: close
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use presentation_core::{Error, PresentationConfig, Result};
use presentation_session::PlatformSpec;

/// One user or platform action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Press the primary surface's "show" trigger
    Show,
    /// Press the primary surface's "close" trigger
    Close,
    /// Press a control on the secondary surface
    Press {
        /// Control name
        control: String,
    },
    /// Confirm the oldest open dialog on the primary surface
    ConfirmDialog,
    /// The user returns from the permission settings screen
    PermissionResult {
        /// Request code delivered with the result
        code: u32,
        /// Whether the user granted the permission
        granted: bool,
    },
    /// Let time pass
    Wait {
        /// Milliseconds to wait
        ms: u64,
    },
    /// Destroy the primary context
    Destroy,
    /// Log the current session
    Status,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Show => write!(f, "show"),
            Step::Close => write!(f, "close"),
            Step::Press { control } => write!(f, "press {control}"),
            Step::ConfirmDialog => write!(f, "confirm_dialog"),
            Step::PermissionResult { code, granted } => {
                write!(f, "permission_result code={code} granted={granted}")
            }
            Step::Wait { ms } => write!(f, "wait {ms}ms"),
            Step::Destroy => write!(f, "destroy"),
            Step::Status => write!(f, "status"),
        }
    }
}

/// A scenario file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Presentation configuration
    pub config: PresentationConfig,
    /// Simulated platform
    pub platform: PlatformSpec,
    /// Actions to replay
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a scenario from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let scenario: Scenario =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        scenario.config.validate()?;
        Ok(scenario)
    }
}
