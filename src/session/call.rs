// ABOUTME: Emergency call state machine coordinating camera, location tracking and panic analysis
// All async work reports back as epoch-tagged events; only the owner of the session mutates state

use super::{PollingScheduler, SessionConfig, SessionError};
use crate::classifier::ClassifierClient;
use crate::device::{CameraDevice, DeviceError, LocationService, LocationTracker, MediaHandle};
use crate::models::{AlertLevel, PermissionState, Permissions, Position, Verdict};
use crate::notification::{Notification, NotificationSender};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle of an emergency call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    /// No call
    Idle,
    /// SOS pressed, waiting out the settling delay
    Starting,
    /// Location shared and analysis running
    Active,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CallStatus::Idle => "idle",
            CallStatus::Starting => "starting",
            CallStatus::Active => "active",
        };
        f.write_str(text)
    }
}

/// Result of background work, tagged with the epoch of the call that spawned it
#[derive(Debug)]
pub struct SessionEvent {
    epoch: u64,
    kind: SessionEventKind,
}

#[derive(Debug)]
enum SessionEventKind {
    Ready,
    Camera(Result<MediaHandle, DeviceError>),
    Verdict { seq: u64, verdict: Verdict },
    Location(Position),
    LocationError(DeviceError),
}

/// Collaborators injected into a session
pub struct SessionDeps {
    /// Camera source
    pub camera: Arc<dyn CameraDevice>,
    /// Geolocation source
    pub location: Arc<dyn LocationService>,
    /// Panic classifier
    pub classifier: ClassifierClient,
    /// Live guardian count
    pub guardians: watch::Receiver<usize>,
    /// Where toasts go
    pub notifier: NotificationSender,
}

/// Snapshot of what a session currently holds, for leak checks and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceUsage {
    /// Settling delay or camera prompt still outstanding
    pub start_pending: bool,
    /// Classifier ticker running
    pub polling: bool,
    /// Location subscription held
    pub location: bool,
    /// Camera tracks still capturing
    pub camera_tracks: usize,
}

impl ResourceUsage {
    /// Nothing held at all
    pub fn is_released(&self) -> bool {
        *self == Self::default()
    }
}

/// Owns one emergency call at a time and everything it holds.
/// 
/// Background work only sends events; state changes when the owner calls
/// `process_pending` or `process_next`.
pub struct CallSession {
    config: SessionConfig,
    status: CallStatus,
    epoch: u64,
    call_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    guardians: watch::Receiver<usize>,
    camera_device: Arc<dyn CameraDevice>,
    camera: Option<MediaHandle>,
    location: LocationTracker,
    polling: PollingScheduler,
    classifier: ClassifierClient,
    start_task: Option<JoinHandle<()>>,
    position: Option<Position>,
    verdict: Option<Verdict>,
    last_verdict_seq: u64,
    permissions: Permissions,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    notifier: NotificationSender,
}

impl CallSession {
    /// Idle session
    pub fn new(config: SessionConfig, deps: SessionDeps) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            status: CallStatus::Idle,
            epoch: 0,
            call_id: None,
            started_at: None,
            guardians: deps.guardians,
            camera_device: deps.camera,
            camera: None,
            location: LocationTracker::new(deps.location),
            polling: PollingScheduler::new(),
            classifier: deps.classifier,
            start_task: None,
            position: None,
            verdict: None,
            last_verdict_seq: 0,
            permissions: Permissions::default(),
            events_tx,
            events_rx,
            notifier: deps.notifier,
        }
    }

    /// Current lifecycle state
    pub fn status(&self) -> CallStatus {
        self.status
    }

    /// Bumped on every start and teardown; events from older epochs are ignored
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Id of the call in progress
    pub fn call_id(&self) -> Option<Uuid> {
        self.call_id
    }

    /// When the call went active
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Guardians that would be alerted right now
    pub fn guardian_count(&self) -> usize {
        *self.guardians.borrow()
    }

    /// Last known position during this call
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Latest applied verdict during this call
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Device permissions for this call
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Session timing
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// What the session currently holds
    pub fn resources(&self) -> ResourceUsage {
        ResourceUsage {
            start_pending: self.start_task.is_some(),
            polling: self.polling.is_running(),
            location: self.location.is_running(),
            camera_tracks: self.camera.as_ref().map_or(0, MediaHandle::live_tracks),
        }
    }

    /// Begin an emergency call. Requires at least one guardian and no call in progress;
    /// a rejected start leaves the session untouched.
    pub fn start_call(&mut self) -> Result<(), SessionError> {
        if self.status != CallStatus::Idle {
            debug!("Ignoring start request while call is {}", self.status);
            return Err(SessionError::AlreadyInProgress(self.status));
        }

        let guardians = self.guardian_count();
        if guardians == 0 {
            warn!("Cannot start call without guardians");
            return Err(SessionError::NoGuardians);
        }

        self.epoch += 1;
        let epoch = self.epoch;
        let call_id = Uuid::new_v4();
        self.call_id = Some(call_id);
        self.permissions.reset();
        self.status = CallStatus::Starting;
        info!("Starting call {} (epoch {}) with {} guardians", call_id, epoch, guardians);

        let camera = Arc::clone(&self.camera_device);
        let settle_delay = self.config.settle_delay;
        let events = self.events_tx.clone();
        self.start_task = Some(tokio::spawn(async move {
            let acquire = camera.acquire();
            tokio::pin!(acquire);
            let settle = tokio::time::sleep(settle_delay);
            tokio::pin!(settle);

            // The camera prompt may take arbitrarily long; it never holds back activation
            let mut early = None;
            tokio::select! {
                result = &mut acquire => {
                    early = Some(result);
                    settle.as_mut().await;
                }
                () = &mut settle => {}
            }

            // A send failure means the session is gone; any handle drops and releases itself
            if events.send(SessionEvent { epoch, kind: SessionEventKind::Ready }).is_err() {
                return;
            }
            let result = match early {
                Some(result) => result,
                None => acquire.await,
            };
            let _ = events.send(SessionEvent {
                epoch,
                kind: SessionEventKind::Camera(result),
            });
        }));

        Ok(())
    }

    /// End the call in progress and release everything it holds.
    /// Once this returns no earlier background work can change the session.
    pub fn end_call(&mut self) -> Result<(), SessionError> {
        if self.status == CallStatus::Idle {
            return Err(SessionError::NotInProgress);
        }

        let call_id = self.call_id;
        self.teardown();
        info!("Call {:?} ended", call_id);
        self.notify(Notification::info("Call Ended"));
        Ok(())
    }

    /// Stop all call activity without notifying; used when the owner goes away
    pub fn shutdown(&mut self) {
        if self.status != CallStatus::Idle {
            info!("Shutting down active call {:?}", self.call_id);
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(task) = self.start_task.take() {
            task.abort();
        }
        self.polling.stop();
        self.location.stop();
        if let Some(camera) = self.camera.take() {
            camera.release();
        }

        // Everything queued so far belongs to the call being torn down
        while let Ok(event) = self.events_rx.try_recv() {
            debug!("Dropping pending event from epoch {}", event.epoch);
        }

        self.epoch += 1;
        self.status = CallStatus::Idle;
        self.call_id = None;
        self.started_at = None;
        self.position = None;
        self.verdict = None;
        self.last_verdict_seq = 0;
    }

    /// Apply every event that has already arrived. Returns how many were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next event and apply it. Returns false if it was stale.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        if event.epoch != self.epoch {
            debug!(
                "Discarding stale {} from epoch {} (current {})",
                event.kind.name(),
                event.epoch,
                self.epoch
            );
            return false;
        }

        match event.kind {
            SessionEventKind::Ready => self.activate(),
            SessionEventKind::Camera(camera) => self.attach_camera(camera),
            SessionEventKind::Verdict { seq, verdict } => self.apply_verdict(seq, verdict),
            SessionEventKind::Location(position) => {
                if self.status != CallStatus::Active {
                    return false;
                }
                self.position = Some(position);
                self.permissions.location = PermissionState::Granted;
                true
            }
            SessionEventKind::LocationError(e) => {
                if self.status != CallStatus::Active {
                    return false;
                }
                self.permissions.location = PermissionState::Denied;
                debug!("Location unavailable: {}", e);
                self.notify(
                    Notification::destructive("Location Error")
                        .with_description("Could not retrieve your location."),
                );
                true
            }
        }
    }

    fn activate(&mut self) -> bool {
        if self.status != CallStatus::Starting {
            return false;
        }

        self.status = CallStatus::Active;
        self.started_at = Some(Utc::now());
        let epoch = self.epoch;

        let updates = self.events_tx.clone();
        let errors = self.events_tx.clone();
        self.location.start(
            move |position| {
                let _ = updates.send(SessionEvent {
                    epoch,
                    kind: SessionEventKind::Location(position),
                });
            },
            move |error| {
                let _ = errors.send(SessionEvent {
                    epoch,
                    kind: SessionEventKind::LocationError(error),
                });
            },
        );

        let verdicts = self.events_tx.clone();
        self.polling.start(
            self.config.poll_interval,
            self.classifier.clone(),
            self.config.scene.clone(),
            move |seq, verdict| {
                let _ = verdicts.send(SessionEvent {
                    epoch,
                    kind: SessionEventKind::Verdict { seq, verdict },
                });
            },
        );

        let guardians = self.guardian_count();
        info!("Call {:?} active, alerting {} guardians", self.call_id, guardians);
        self.notify(
            Notification::info("Guardian Alert Sent").with_description(format!(
                "Alerting {} guardian{}. Your live location and video are being shared.",
                guardians,
                if guardians == 1 { "" } else { "s" }
            )),
        );
        true
    }

    /// Camera permission resolves once per call, at or after activation
    fn attach_camera(&mut self, camera: Result<MediaHandle, DeviceError>) -> bool {
        if self.status != CallStatus::Active {
            return false;
        }
        self.start_task = None;

        match camera {
            Ok(handle) => {
                info!("Camera stream {} acquired", handle.id());
                self.permissions.camera = PermissionState::Granted;
                self.camera = Some(handle);
            }
            Err(e) => {
                warn!("Error accessing camera: {}", e);
                self.permissions.camera = PermissionState::Denied;
                self.notify(
                    Notification::destructive("Camera Access Denied")
                        .with_description("Please enable camera permissions to share live video."),
                );
            }
        }
        true
    }

    fn apply_verdict(&mut self, seq: u64, verdict: Verdict) -> bool {
        if self.status != CallStatus::Active {
            return false;
        }
        if seq <= self.last_verdict_seq {
            debug!(
                "Discarding out-of-order verdict #{} (latest #{})",
                seq, self.last_verdict_seq
            );
            return false;
        }
        self.last_verdict_seq = seq;

        if verdict.panic_detected {
            warn!(
                "Panic detected in call {:?}: level={} actions=[{}]",
                self.call_id,
                verdict.alert_level,
                verdict.actions_summary()
            );
            let title = format!("Panic Detected: {}", verdict.alert_level.as_str().to_uppercase());
            let notification = if verdict.alert_level == AlertLevel::High {
                Notification::destructive(title)
            } else {
                Notification::info(title)
            };
            self.notify(notification.with_description(format!(
                "Actions taken: {}",
                verdict.actions_summary()
            )));
        }

        self.verdict = Some(verdict);
        true
    }

    fn notify(&self, notification: Notification) {
        let notification = notification.with_duration(self.config.notification_duration);
        // Nobody listening is fine; notifications are advisory
        let _ = self.notifier.send(notification);
    }
}

impl SessionEventKind {
    fn name(&self) -> &'static str {
        match self {
            SessionEventKind::Ready => "settle completion",
            SessionEventKind::Camera(_) => "camera result",
            SessionEventKind::Verdict { .. } => "verdict",
            SessionEventKind::Location(_) => "location update",
            SessionEventKind::LocationError(_) => "location error",
        }
    }
}

impl Drop for CallSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
