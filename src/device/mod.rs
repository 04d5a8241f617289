// ABOUTME: Platform device access: camera acquisition and continuous geolocation

/// Camera streams
pub mod camera;
/// Device errors
pub mod error;
/// Location subscriptions
pub mod location;
/// Simulated devices for the terminal app
pub mod simulated;

pub use camera::{CameraDevice, MediaHandle, MediaTrack, TrackKind, TrackMonitor};
pub use error::DeviceError;
pub use location::{LocationService, LocationStream, LocationTracker};
pub use simulated::{SimulatedCamera, SimulatedLocation};
