// ABOUTME: Emergency call session: lifecycle state machine, classifier polling and derived view
// Owns every task, subscription and device handle that a call starts

/// The call state machine
pub mod call;
/// Rejected transitions
pub mod error;
/// Classifier polling
pub mod polling;
/// Derived UI state
pub mod view;

pub use call::{CallSession, CallStatus, ResourceUsage, SessionDeps, SessionEvent};
pub use error::SessionError;
pub use polling::PollingScheduler;
pub use view::{
    AnalysisPanel, CameraPanel, KeychainView, ANALYZING, CAMERA_DENIED, GETTING_COORDINATES,
    LOCATION_UNAVAILABLE, NO_THREATS,
};

use crate::classifier::Scene;
use crate::notification::DEFAULT_NOTIFICATION_DURATION;
use std::time::Duration;

/// Timing and input for a call session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause between pressing SOS and the call going live
    pub settle_delay: Duration,
    /// Time between classifications
    pub poll_interval: Duration,
    /// Display time for the session's toasts
    pub notification_duration: Duration,
    /// Scene sent to the classifier on every poll
    pub scene: Scene,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1500),
            poll_interval: Duration::from_secs(5),
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
            scene: Scene::placeholder(),
        }
    }
}
