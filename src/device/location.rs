// ABOUTME: Continuous location tracking over a platform geolocation subscription

use super::DeviceError;
use crate::models::Position;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Push updates from a location subscription
pub type LocationStream = BoxStream<'static, Result<Position, DeviceError>>;

/// Host geolocation service delivering push updates
pub trait LocationService: Send + Sync {
    /// Open a continuous position subscription. Dropping the stream unsubscribes.
    fn watch(&self) -> Result<LocationStream, DeviceError>;
}

/// Owns at most one location subscription at a time
pub struct LocationTracker {
    service: Arc<dyn LocationService>,
    task: Option<JoinHandle<()>>,
}

impl LocationTracker {
    /// Idle tracker over `service`
    pub fn new(service: Arc<dyn LocationService>) -> Self {
        Self { service, task: None }
    }

    /// Subscribe and forward every update and error until stopped.
    /// Errors do not end the subscription.
    pub fn start<U, E>(&mut self, on_update: U, on_error: E)
    where
        U: Fn(Position) + Send + 'static,
        E: Fn(DeviceError) + Send + 'static,
    {
        self.stop();

        match self.service.watch() {
            Ok(mut stream) => {
                info!("Location tracking started");
                self.task = Some(tokio::spawn(async move {
                    while let Some(update) = stream.next().await {
                        match update {
                            Ok(position) => on_update(position),
                            Err(e) => {
                                warn!("Error getting location: {}", e);
                                on_error(e);
                            }
                        }
                    }
                    debug!("Location stream closed by platform");
                }));
            }
            Err(e) => {
                warn!("Could not subscribe to location updates: {}", e);
                on_error(e);
            }
        }
    }

    /// Cancel the subscription. Safe to call when nothing was started.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Location tracking stopped");
        }
    }

    /// Whether a subscription is held
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
