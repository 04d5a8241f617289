// ABOUTME: Error types for call session transitions
// A rejected transition leaves the session untouched

use super::CallStatus;
use thiserror::Error;

/// Why a call transition was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Nobody would be alerted
    #[error("No guardians configured, cannot start a call")]
    NoGuardians,

    /// A call is starting or active
    #[error("A call is already {0}")]
    AlreadyInProgress(CallStatus),

    /// There is no call to end
    #[error("No call in progress")]
    NotInProgress,
}
