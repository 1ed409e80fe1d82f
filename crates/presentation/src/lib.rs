//! Presentation scenario runner library.
//!
//! This library contains the scenario format and the shell that plays it
//! against a simulated platform. The binary is in main.rs.

pub mod scenario;
pub mod shell;

// Re-export commonly used types
pub use scenario::{Scenario, Step};
pub use shell::{ChannelPrimary, Report, Shell, StepReport, UiEvent};
