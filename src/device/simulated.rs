// ABOUTME: Simulated camera and location sources for the terminal keychain
// Stand in for platform device APIs where no real camera or GPS is wired up

use super::camera::{CameraDevice, MediaHandle, MediaTrack, TrackKind};
use super::location::{LocationService, LocationStream};
use super::DeviceError;
use crate::config::DeviceConfig;
use crate::models::Position;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;

/// Camera that grants or denies after a short prompt delay
#[derive(Debug, Clone)]
pub struct SimulatedCamera {
    denied: bool,
    acquire_delay: Duration,
}

impl SimulatedCamera {
    /// Grants access
    pub fn granted() -> Self {
        Self {
            denied: false,
            acquire_delay: Duration::from_millis(200),
        }
    }

    /// Refuses access
    pub fn denied() -> Self {
        Self {
            denied: true,
            acquire_delay: Duration::from_millis(200),
        }
    }

    /// Honors `camera_denied`
    pub fn from_config(config: &DeviceConfig) -> Self {
        if config.camera_denied {
            Self::denied()
        } else {
            Self::granted()
        }
    }
}

#[async_trait]
impl CameraDevice for SimulatedCamera {
    async fn acquire(&self) -> Result<MediaHandle, DeviceError> {
        tokio::time::sleep(self.acquire_delay).await;
        if self.denied {
            return Err(DeviceError::PermissionDenied("camera".to_string()));
        }
        Ok(MediaHandle::new(vec![MediaTrack::new(
            TrackKind::Video,
            "Simulated 360 camera",
        )]))
    }
}

/// Emits a slowly drifting position around a fixed origin
#[derive(Debug, Clone)]
pub struct SimulatedLocation {
    origin: Position,
    interval: Duration,
}

impl SimulatedLocation {
    /// Drift applied per update, roughly one metre of latitude
    const STEP_DEGREES: f64 = 0.000_01;

    /// Fixes around `origin`, one per `interval`
    pub fn new(origin: Position, interval: Duration) -> Self {
        Self { origin, interval }
    }

    /// Origin and interval from config
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self::new(
            Position::new(config.latitude, config.longitude),
            Duration::from_secs(config.location_interval_secs),
        )
    }

    fn position_at(origin: Position, step: u32) -> Position {
        let drift = f64::from(step % 20) * Self::STEP_DEGREES;
        Position::new(origin.latitude + drift, origin.longitude - drift / 2.0)
    }
}

impl LocationService for SimulatedLocation {
    fn watch(&self) -> Result<LocationStream, DeviceError> {
        let origin = self.origin;
        let mut step = 0u32;
        let ticks = IntervalStream::new(tokio::time::interval(self.interval));

        Ok(ticks
            .map(move |_| {
                let position = Self::position_at(origin, step);
                step = step.wrapping_add(1);
                Ok(position)
            })
            .boxed())
    }
}
