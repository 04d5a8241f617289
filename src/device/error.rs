// ABOUTME: Error types for platform device access (camera and geolocation)

use thiserror::Error;

/// Failure reported by a camera or location device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// User or platform refused access to the named device
    #[error("Permission denied for {0}")]
    PermissionDenied(String),

    /// No such device
    #[error("Device unavailable: {0}")]
    Unavailable(String),

    /// Location fix could not be obtained
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// Device did not answer in time
    #[error("Device request timed out")]
    Timeout,
}

impl DeviceError {
    /// True for refusals, as opposed to device faults
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, DeviceError::PermissionDenied(_))
    }
}
