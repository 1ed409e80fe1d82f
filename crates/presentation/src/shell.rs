//! Scenario shell.
//!
//! Plays the role of the primary application window: it owns the
//! [`PresentationController`], forwards trigger presses to it and receives the
//! dialogs and notices the presentation sends back. Those arrive through an
//! mpsc channel, which is how calls made from the secondary surface's handlers
//! are marshalled onto the primary context's loop.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use presentation_core::{Error, Notice, Result, SessionInfo};
use presentation_session::{
    primary_handle, DialogRequest, PlatformServices, PresentationController, PrimaryContext,
    SimulatedPlatform,
};

use crate::scenario::{Scenario, Step};

/// Message posted to the primary context's loop.
#[derive(Debug)]
pub enum UiEvent {
    /// Display a dialog
    Dialog(DialogRequest),
    /// Display a transient notice
    Notice(Notice),
}

/// Primary context that posts everything onto a channel.
pub struct ChannelPrimary {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl ChannelPrimary {
    /// Create a primary context and the receiving end of its loop.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn post(&self, event: UiEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Primary loop closed, dropping {:?}", e.0);
        }
    }
}

impl PrimaryContext for ChannelPrimary {
    fn show_dialog(&self, dialog: DialogRequest) {
        self.post(UiEvent::Dialog(dialog));
    }

    fn show_notice(&self, notice: Notice) {
        self.post(UiEvent::Notice(notice));
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Step description
    pub step: String,
    /// Whether the step succeeded
    pub ok: bool,
    /// Result or error message
    pub detail: String,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    /// Per-step outcomes
    pub steps: Vec<StepReport>,
    /// Titles of dialogs shown on the primary surface
    pub dialogs: Vec<String>,
    /// Notices shown on the primary surface
    pub notices: Vec<Notice>,
    /// Session left over after the last step
    pub final_session: Option<SessionInfo>,
}

/// The primary window of a scenario run.
pub struct Shell {
    controller: PresentationController,
    platform: Arc<SimulatedPlatform>,
    primary: Option<Arc<ChannelPrimary>>,
    ui_rx: mpsc::UnboundedReceiver<UiEvent>,
    open_dialogs: VecDeque<DialogRequest>,
    report: Report,
}

impl Shell {
    /// Build the simulated platform and controller for a scenario, then run
    /// the startup permission check.
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let version = scenario.config.platform.version;
        let platform = Arc::new(SimulatedPlatform::from_spec(version, &scenario.platform)?);
        let (primary, ui_rx) = ChannelPrimary::new();
        let primary = Arc::new(primary);

        let mut controller = PresentationController::new(
            scenario.config.clone(),
            PlatformServices::from_platform(Arc::clone(&platform)),
            primary_handle(&primary),
        );
        let state = controller.check_authorization()?;
        info!("Startup authorization on {}: {:?}", version, state);

        Ok(Self {
            controller,
            platform,
            primary: Some(primary),
            ui_rx,
            open_dialogs: VecDeque::new(),
            report: Report::default(),
        })
    }

    /// Replay steps in order and collect the report.
    pub async fn run(mut self, steps: Vec<Step>) -> Report {
        for step in steps {
            let description = step.to_string();
            let result = self.apply(step).await;
            self.drain_ui();

            let report = match result {
                Ok(detail) => {
                    debug!("Step '{}' ok: {}", description, detail);
                    StepReport {
                        step: description,
                        ok: true,
                        detail,
                    }
                }
                Err(e) => {
                    if e.is_recoverable() {
                        warn!("Step '{}' failed: {}", description, e);
                    } else {
                        error!("Step '{}' failed: {}", description, e);
                    }
                    StepReport {
                        step: description,
                        ok: false,
                        detail: e.to_string(),
                    }
                }
            };
            self.report.steps.push(report);
        }

        self.report.final_session = self.controller.current_session();
        self.report
    }

    async fn apply(&mut self, step: Step) -> Result<String> {
        match step {
            Step::Show => {
                let id = self.controller.show()?;
                Ok(format!("session {id} showing"))
            }
            Step::Close => {
                self.controller.close();
                Ok("closed".to_string())
            }
            Step::Press { control } => {
                let outcome = self.controller.press_control(&control)?;
                Ok(format!("{outcome:?}"))
            }
            Step::ConfirmDialog => {
                // Confirmation callbacks post their notice back onto the loop
                self.drain_ui();
                let dialog = self
                    .open_dialogs
                    .pop_front()
                    .ok_or_else(|| Error::IllegalState("no open dialog".to_string()))?;
                let title = dialog.title.clone();
                dialog.confirm();
                Ok(format!("confirmed '{title}'"))
            }
            Step::PermissionResult { code, granted } => {
                self.platform.set_overlay_permission(granted);
                match self.controller.on_authorization_result(code) {
                    Some(state) => Ok(format!("{state:?}")),
                    None => Ok(format!("ignored result with code {code}")),
                }
            }
            Step::Wait { ms } => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(format!("waited {ms}ms"))
            }
            Step::Destroy => {
                self.controller.on_primary_destroyed();
                self.primary = None;
                Ok("primary destroyed".to_string())
            }
            Step::Status => {
                let status = match self.controller.current_session() {
                    Some(info) => serde_json::to_string(&info)?,
                    None => "no session".to_string(),
                };
                info!("Status: {}", status);
                Ok(status)
            }
        }
    }

    fn drain_ui(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Dialog(dialog) => {
                    info!("Dialog shown: '{}' - {}", dialog.title, dialog.message);
                    self.report.dialogs.push(dialog.title.clone());
                    self.open_dialogs.push_back(dialog);
                }
                UiEvent::Notice(notice) => {
                    info!("Notice: {}", notice);
                    self.report.notices.push(notice);
                }
            }
        }
    }
}
