//! Overlay authorization state.

use serde::{Deserialize, Serialize};

/// Whether the application may draw above other applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    /// Not yet checked
    #[default]
    Unknown,
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
}

impl AuthorizationState {
    /// Map a grant check onto a state.
    pub fn from_granted(granted: bool) -> Self {
        if granted {
            AuthorizationState::Granted
        } else {
            AuthorizationState::Denied
        }
    }

    /// Check whether the state is [`AuthorizationState::Granted`].
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationState::Granted)
    }
}
