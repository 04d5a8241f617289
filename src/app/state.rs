// ABOUTME: Application state for the keychain TUI and the tick loop that drives the call session

use crate::classifier::ClassifierClient;
use crate::config::AppConfig;
use crate::device::{CameraDevice, LocationService, SimulatedCamera, SimulatedLocation};
use crate::guardians::GuardianRegistry;
use crate::notification::{self, Notification, NotificationReceiver};
use crate::session::{CallSession, KeychainView, SessionConfig, SessionDeps};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Toasts beyond this many push out the oldest
const MAX_TOASTS: usize = 3;
const GUARDIAN_RELOAD_INTERVAL: Duration = Duration::from_secs(5);

/// Call action waiting for the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    /// Start a call
    StartCall,
    /// End the call
    EndCall,
    /// Reload guardians on request
    ReloadGuardians,
}

/// Everything the components need to draw a frame
#[derive(Debug, Default)]
pub struct AppState {
    /// Set once the user asks to quit
    pub should_quit: bool,
    /// Help overlay shown
    pub help_visible: bool,
    /// Unexpired toasts, oldest first
    pub toasts: Vec<Notification>,
    /// Snapshot of the call session
    pub view: KeychainView,
    /// Set by `EventHandler::process_event`, taken by `App::tick`
    pub pending_action: Option<PendingAction>,
    /// Inline advisory for rejected actions, e.g. no guardians configured
    pub status_message: Option<String>,
}

impl AppState {
    /// Empty state with no call and no toasts
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Flip the help overlay
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    fn push_toast(&mut self, toast: Notification) {
        self.toasts.push(toast);
        if self.toasts.len() > MAX_TOASTS {
            let overflow = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..overflow);
        }
    }
}

/// The keychain app: UI state plus the call session it drives
pub struct App {
    /// State read by the components
    pub state: AppState,
    session: CallSession,
    registry: GuardianRegistry,
    notifications: NotificationReceiver,
    last_reload: Instant,
    ui_dirty: bool,
}

impl App {
    /// Assemble an app from its collaborators
    pub fn new(
        config: SessionConfig,
        registry: GuardianRegistry,
        camera: Arc<dyn CameraDevice>,
        location: Arc<dyn LocationService>,
        classifier: ClassifierClient,
    ) -> Self {
        let (notifier, notifications) = notification::channel();
        let session = CallSession::new(
            config,
            SessionDeps {
                camera,
                location,
                classifier,
                guardians: registry.subscribe(),
                notifier,
            },
        );

        let mut state = AppState::new();
        state.view = KeychainView::from_session(&session);

        Self {
            state,
            session,
            registry,
            notifications,
            last_reload: Instant::now(),
            ui_dirty: true,
        }
    }

    /// Wire the simulated devices and configured classifier together
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let guardians_path = config.guardians_path()?;
        let registry = GuardianRegistry::open(&guardians_path)
            .with_context(|| format!("Failed to open guardians at {}", guardians_path.display()))?;
        let classifier = ClassifierClient::from_config(&config.classifier)?;
        info!(
            "Using '{}' classifier with {} guardians",
            classifier.backend_name(),
            registry.count()
        );

        Ok(Self::new(
            config.session_config()?,
            registry,
            Arc::new(SimulatedCamera::from_config(&config.devices)),
            Arc::new(SimulatedLocation::from_config(&config.devices)),
            classifier,
        ))
    }

    /// The call session
    pub fn session(&self) -> &CallSession {
        &self.session
    }

    /// The guardian registry
    pub fn registry(&self) -> &GuardianRegistry {
        &self.registry
    }

    /// Run pending actions, apply session events and refresh the view
    pub fn tick(&mut self) {
        let action = self.state.pending_action.take();
        if let Some(action) = action {
            self.run_action(action);
        }

        if self.last_reload.elapsed() >= GUARDIAN_RELOAD_INTERVAL {
            self.reload_guardians();
        }

        let applied = self.session.process_pending();

        let mut new_toasts = false;
        while let Ok(toast) = self.notifications.try_recv() {
            self.state.push_toast(toast);
            new_toasts = true;
        }
        let before = self.state.toasts.len();
        self.state.toasts.retain(|toast| !toast.is_expired());
        let expired = before != self.state.toasts.len();

        let could_start = self.state.view.can_start;
        self.state.view = KeychainView::from_session(&self.session);
        // A rejection advisory is obsolete once the SOS button is usable again
        let unblocked = !could_start && self.state.view.can_start;
        if unblocked && action.is_none() {
            self.state.status_message = None;
        }
        self.ui_dirty = applied > 0 || new_toasts || expired || unblocked;
    }

    fn run_action(&mut self, action: PendingAction) {
        self.state.status_message = None;
        match action {
            PendingAction::StartCall => {
                if let Err(e) = self.session.start_call() {
                    warn!("Start call rejected: {}", e);
                    self.state.status_message = Some(e.to_string());
                }
            }
            PendingAction::EndCall => {
                if let Err(e) = self.session.end_call() {
                    warn!("End call rejected: {}", e);
                }
            }
            PendingAction::ReloadGuardians => {
                self.reload_guardians();
                self.state.status_message =
                    Some(format!("{} guardians configured", self.registry.count()));
            }
        }
    }

    fn reload_guardians(&mut self) {
        self.last_reload = Instant::now();
        if let Err(e) = self.registry.reload() {
            self.state.status_message = Some(format!("Guardian list unreadable: {}", e));
        }
    }

    /// Whether the last tick changed anything on screen
    pub fn needs_ui_refresh(&self) -> bool {
        self.ui_dirty
    }

    /// Stop the call, if any, before the UI goes away
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }
}
