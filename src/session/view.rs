// ABOUTME: Derived UI state for the keychain screen, computed from a call session

use super::{CallSession, CallStatus};
use crate::models::AlertLevel;

/// Location text before the first fix
pub const GETTING_COORDINATES: &str = "Getting coordinates...";
/// Location text after a location error
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";
/// Analysis text before the first verdict
pub const ANALYZING: &str = "Analyzing surroundings...";
/// Analysis text for a clear verdict
pub const NO_THREATS: &str = "No immediate threats detected.";
/// Video placeholder when the camera is refused
pub const CAMERA_DENIED: &str = "Camera access denied";

/// What the video panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPanel {
    /// Waiting for the camera prompt
    Pending,
    /// Streaming
    Live,
    /// Placeholder shown instead of the video feed
    Denied,
}

/// What the analysis panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisPanel {
    /// No verdict yet
    Analyzing,
    /// Latest verdict found no panic
    Clear,
    /// Panic detected, with severity and an actions line
    Alert {
        /// Severity badge
        level: AlertLevel,
        /// Comma-separated actions, or a fallback line
        actions: String,
    },
}

impl AnalysisPanel {
    /// Main line of the panel
    pub fn headline(&self) -> &str {
        match self {
            AnalysisPanel::Analyzing => ANALYZING,
            AnalysisPanel::Clear => NO_THREATS,
            AnalysisPanel::Alert { level, .. } => level.badge(),
        }
    }
}

/// Everything the keychain screen shows, derived from a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeychainView {
    /// Call lifecycle
    pub status: CallStatus,
    /// Guardians that would be alerted
    pub guardian_count: usize,
    /// SOS button enabled
    pub can_start: bool,
    /// Call starting
    pub is_loading: bool,
    /// Call active
    pub is_calling: bool,
    /// Coordinates or a placeholder
    pub location: String,
    /// Video panel
    pub camera: CameraPanel,
    /// Analysis panel
    pub analysis: AnalysisPanel,
}

impl Default for KeychainView {
    fn default() -> Self {
        Self {
            status: CallStatus::Idle,
            guardian_count: 0,
            can_start: false,
            is_loading: false,
            is_calling: false,
            location: GETTING_COORDINATES.to_string(),
            camera: CameraPanel::Pending,
            analysis: AnalysisPanel::Analyzing,
        }
    }
}

impl KeychainView {
    /// Snapshot `session`
    pub fn from_session(session: &CallSession) -> Self {
        let status = session.status();
        let guardian_count = session.guardian_count();
        let permissions = session.permissions();

        let location = match session.position() {
            Some(position) => position.to_string(),
            None if permissions.location.is_denied() => LOCATION_UNAVAILABLE.to_string(),
            None => GETTING_COORDINATES.to_string(),
        };

        let camera = if permissions.camera.is_denied() {
            CameraPanel::Denied
        } else if session.resources().camera_tracks > 0 {
            CameraPanel::Live
        } else {
            CameraPanel::Pending
        };

        let analysis = match session.verdict() {
            None => AnalysisPanel::Analyzing,
            Some(verdict) if verdict.panic_detected => AnalysisPanel::Alert {
                level: verdict.alert_level,
                actions: format!("Actions: {}", verdict.actions_label()),
            },
            Some(_) => AnalysisPanel::Clear,
        };

        Self {
            status,
            guardian_count,
            can_start: status == CallStatus::Idle && guardian_count > 0,
            is_loading: status == CallStatus::Starting,
            is_calling: status == CallStatus::Active,
            location,
            camera,
            analysis,
        }
    }
}
