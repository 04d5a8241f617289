// ABOUTME: Camera acquisition and guaranteed release of media tracks
// A MediaHandle stops its tracks on release and on drop, so the camera never stays live by accident

use super::DeviceError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Media type carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Camera frames
    Video,
    /// Microphone samples
    Audio,
}

/// One live capture track of a media device
#[derive(Debug)]
pub struct MediaTrack {
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

/// Read-only view of a track's liveness, kept by whoever created the track
#[derive(Debug, Clone)]
pub struct TrackMonitor {
    live: Arc<AtomicBool>,
}

impl TrackMonitor {
    /// Whether the track is still capturing
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

impl MediaTrack {
    /// A new, live track
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Media type
    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Device label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the track is still capturing
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Observer that outlives the track
    pub fn monitor(&self) -> TrackMonitor {
        TrackMonitor {
            live: Arc::clone(&self.live),
        }
    }

    /// Stop capturing. Idempotent.
    pub fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            debug!("Stopped {:?} track '{}'", self.kind, self.label);
        }
    }
}

/// An acquired camera stream
#[derive(Debug)]
pub struct MediaHandle {
    id: Uuid,
    tracks: Vec<MediaTrack>,
}

impl MediaHandle {
    /// Take ownership of acquired tracks
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tracks,
        }
    }

    /// Unique id for logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Tracks still capturing
    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// All tracks, live or stopped
    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    /// Stop every underlying track and give up the handle
    pub fn release(mut self) {
        info!("Releasing camera stream {}", self.id);
        self.stop_tracks();
    }

    fn stop_tracks(&mut self) {
        for track in self.tracks.drain(..) {
            track.stop();
        }
    }
}

impl Drop for MediaHandle {
    fn drop(&mut self) {
        if !self.tracks.is_empty() {
            debug!("Camera stream {} dropped without release, stopping tracks", self.id);
            self.stop_tracks();
        }
    }
}

/// Source of camera streams on the host platform
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request camera access. Callers make a single attempt per call.
    async fn acquire(&self) -> Result<MediaHandle, DeviceError>;
}
