// ABOUTME: Core data models for calls: verdicts, positions and device permissions

/// Device permission states
pub mod permission;
/// Geographic positions
pub mod position;
/// Classifier verdicts
pub mod verdict;

pub use permission::{PermissionState, Permissions};
pub use position::Position;
pub use verdict::{ActionTag, AlertLevel, Verdict, ANALYSIS_ERROR_MARKER};
