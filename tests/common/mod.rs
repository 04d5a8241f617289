// ABOUTME: Shared fakes for camera, location and classifier plus a session harness for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::StreamExt;
use guardian_keychain::classifier::{Classifier, ClassifierClient, ClassifierError, Scene};
use guardian_keychain::device::{
    CameraDevice, DeviceError, LocationService, LocationStream, MediaHandle, MediaTrack, TrackKind,
    TrackMonitor,
};
use guardian_keychain::guardians::{Guardian, GuardianRegistry};
use guardian_keychain::models::{PermissionState, Position, Verdict};
use guardian_keychain::notification::{self, Notification, NotificationReceiver};
use guardian_keychain::session::{CallSession, CallStatus, SessionConfig, SessionDeps};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub const SETTLE_DELAY: Duration = Duration::from_millis(1500);
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub fn test_config() -> SessionConfig {
    SessionConfig {
        settle_delay: SETTLE_DELAY,
        poll_interval: POLL_INTERVAL,
        ..SessionConfig::default()
    }
}

pub fn guardians(count: usize) -> Vec<Guardian> {
    (0..count)
        .map(|i| Guardian::new(format!("Guardian {}", i + 1), format!("555-01{:02}", i)))
        .collect()
}

/// How long the permission prompt takes to answer
#[derive(Debug, Clone, Copy)]
enum Prompt {
    Immediate,
    After(Duration),
    Never,
}

pub struct FakeCamera {
    deny: bool,
    prompt: Prompt,
    monitors: Mutex<Vec<TrackMonitor>>,
    attempts: AtomicUsize,
}

impl FakeCamera {
    pub fn granted() -> Self {
        Self {
            deny: false,
            prompt: Prompt::Immediate,
            monitors: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Granted, but only after the user sits on the prompt for `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            prompt: Prompt::After(latency),
            ..Self::granted()
        }
    }

    /// A prompt the user never answers
    pub fn unanswered() -> Self {
        Self {
            prompt: Prompt::Never,
            ..Self::granted()
        }
    }

    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::granted()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn live_tracks(&self) -> usize {
        self.monitors.lock().unwrap().iter().filter(|p| p.is_live()).count()
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn acquire(&self) -> Result<MediaHandle, DeviceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.prompt {
            Prompt::Immediate => {}
            Prompt::After(latency) => tokio::time::sleep(latency).await,
            Prompt::Never => std::future::pending::<()>().await,
        }
        if self.deny {
            return Err(DeviceError::PermissionDenied("camera".to_string()));
        }
        let track = MediaTrack::new(TrackKind::Video, "fake camera");
        self.monitors.lock().unwrap().push(track.monitor());
        Ok(MediaHandle::new(vec![track]))
    }
}

type LocationSender = mpsc::UnboundedSender<Result<Position, DeviceError>>;

/// Location service whose updates are pushed by the test
pub struct FakeLocation {
    fail_watch: bool,
    subscribers: Mutex<Vec<LocationSender>>,
}

impl FakeLocation {
    pub fn new() -> Self {
        Self {
            fail_watch: false,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_watch: true,
            ..Self::new()
        }
    }

    pub fn push(&self, update: Result<Position, DeviceError>) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(update.clone()).is_ok());
    }

    pub fn push_position(&self, latitude: f64, longitude: f64) {
        self.push(Ok(Position::new(latitude, longitude)));
    }

    pub fn push_error(&self) {
        self.push(Err(DeviceError::PositionUnavailable("signal lost".to_string())));
    }

    pub fn live_subscriptions(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }
}

impl LocationService for FakeLocation {
    fn watch(&self) -> Result<LocationStream, DeviceError> {
        if self.fail_watch {
            return Err(DeviceError::PermissionDenied("location".to_string()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }
}

/// Classifier that replays scripted (latency, outcome) steps, then a fallback verdict
pub struct ScriptedClassifier {
    script: Mutex<VecDeque<(Duration, Result<Verdict, String>)>>,
    fallback: Verdict,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::with_fallback(Verdict::clear())
    }

    pub fn with_fallback(fallback: Verdict) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, latency: Duration, verdict: Verdict) {
        self.script.lock().unwrap().push_back((latency, Ok(verdict)));
    }

    pub fn push_failure(&self, latency: Duration, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back((latency, Err(message.to_string())));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn classify(&self, _scene: &Scene) -> Result<Verdict, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        let (latency, outcome) = step.unwrap_or_else(|| (Duration::ZERO, Ok(self.fallback.clone())));

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        outcome.map_err(ClassifierError::Unavailable)
    }
}

pub struct Harness {
    pub session: CallSession,
    pub notifications: NotificationReceiver,
    pub registry: GuardianRegistry,
    pub camera: Arc<FakeCamera>,
    pub location: Arc<FakeLocation>,
    pub classifier: Arc<ScriptedClassifier>,
}

impl Harness {
    pub fn new(guardian_count: usize) -> Self {
        Self::with_devices(guardian_count, FakeCamera::granted(), FakeLocation::new())
    }

    pub fn with_devices(guardian_count: usize, camera: FakeCamera, location: FakeLocation) -> Self {
        let registry = GuardianRegistry::in_memory(guardians(guardian_count));
        let camera = Arc::new(camera);
        let location = Arc::new(location);
        let classifier = Arc::new(ScriptedClassifier::new());
        let (notifier, notifications) = notification::channel();

        let session = CallSession::new(
            test_config(),
            SessionDeps {
                camera: camera.clone(),
                location: location.clone(),
                classifier: ClassifierClient::new(classifier.clone()),
                guardians: registry.subscribe(),
                notifier,
            },
        );

        Self {
            session,
            notifications,
            registry,
            camera,
            location,
            classifier,
        }
    }

    /// Start a call and process events until it is active.
    /// An immediate camera answer is queued right behind activation and applied too.
    pub async fn start_and_activate(&mut self) {
        self.session.start_call().expect("call should start");
        while self.session.status() != CallStatus::Active {
            self.session.process_next().await;
        }
        self.session.process_pending();
    }

    /// Process events until the camera prompt has been answered
    pub async fn await_camera(&mut self) {
        while self.session.permissions().camera == PermissionState::Unknown {
            self.session.process_next().await;
        }
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }

    pub fn titles(&mut self) -> Vec<String> {
        self.drain_notifications().into_iter().map(|n| n.title).collect()
    }
}

/// Let aborted tasks get dropped and ready tasks run
pub async fn settle_tasks() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
