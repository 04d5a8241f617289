// ABOUTME: Tri-state device permission tracking for camera and location

use serde::{Deserialize, Serialize};

/// Outcome of a device permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PermissionState {
    /// Not answered yet
    #[default]
    Unknown,
    /// Access given
    Granted,
    /// Access refused or lost
    Denied,
}

impl PermissionState {
    /// Access refused
    pub fn is_denied(&self) -> bool {
        matches!(self, PermissionState::Denied)
    }

    /// Access given
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

/// Permission state per device for the current call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    /// Camera
    pub camera: PermissionState,
    /// Geolocation
    pub location: PermissionState,
}

impl Permissions {
    /// Back to unknown at the start of a call
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
