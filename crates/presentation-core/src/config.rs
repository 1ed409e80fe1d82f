//! Configuration types for presentation sessions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, PlatformVersion, RouteCapability};

/// Presentation configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PresentationConfig {
    /// Platform settings
    pub platform: PlatformSettings,
    /// Route resolution settings
    pub routing: RoutingSettings,
    /// Overlay authorization settings
    pub authorization: AuthorizationSettings,
    /// Texts shown on both surfaces
    pub content: ContentSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl PresentationConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: PresentationConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        // Request codes travel in the lower 16 bits
        if self.authorization.request_code > u32::from(u16::MAX) {
            return Err(Error::Config(format!(
                "authorization.request_code must fit in 16 bits (got {})",
                self.authorization.request_code
            )));
        }

        if self.authorization.app_id.trim().is_empty() {
            return Err(Error::Config(
                "authorization.app_id cannot be empty".to_string(),
            ));
        }

        if self.content.dismiss_control == self.content.dialog_control {
            return Err(Error::Config(format!(
                "content controls must have distinct names (both are '{}')",
                self.content.dialog_control
            )));
        }

        Ok(())
    }
}

/// Platform settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformSettings {
    /// Platform API level
    pub version: PlatformVersion,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            version: PlatformVersion::new(34),
        }
    }
}

/// How the secondary display is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStrategy {
    /// Use the display attached to the selected media route
    #[default]
    MediaRoute,
    /// Use the first presentation-capable display that is not built in
    DisplayEnumeration,
}

/// Route resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Resolution strategy
    pub strategy: ResolveStrategy,
    /// Capability a route must offer
    pub capability: RouteCapability,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            strategy: ResolveStrategy::MediaRoute,
            capability: RouteCapability::LiveAudio,
        }
    }
}

/// Overlay authorization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationSettings {
    /// Request code correlating a permission request with its result
    pub request_code: u32,
    /// Application identity passed to the permission settings screen
    pub app_id: String,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            request_code: 100,
            app_id: "com.example.presentation".to_string(),
        }
    }
}

/// Texts and control names for both surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSettings {
    /// Name of the control that requests a dialog
    pub dialog_control: String,
    /// Name of the control that dismisses the session
    pub dismiss_control: String,
    /// Dialog title
    pub dialog_title: String,
    /// Dialog message
    pub dialog_message: String,
    /// Dialog confirm button label
    pub confirm_label: String,
    /// Notice shown after the dialog is confirmed
    pub acknowledgement: String,
    /// Notice shown when no route is available
    pub unsupported: String,
    /// Notice shown when overlay permission is granted
    pub permission_granted: String,
    /// Notice shown when overlay permission is denied
    pub permission_denied: String,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            dialog_control: "show_dialog".to_string(),
            dismiss_control: "dismiss".to_string(),
            dialog_title: "Notice".to_string(),
            dialog_message: "Dialog requested from the secondary display".to_string(),
            confirm_label: "OK".to_string(),
            acknowledgement: "Primary dialog confirmed".to_string(),
            unsupported: "Secondary display not supported".to_string(),
            permission_granted: "Permission gained.".to_string(),
            permission_denied: "Permission denied!".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
