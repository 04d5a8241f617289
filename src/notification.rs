// ABOUTME: Transient user-facing notifications (toasts) raised during a call
// Fire-and-forget advisories with automatic expiry; never part of session state

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long a toast stays up unless configured otherwise
pub const DEFAULT_NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// Sending half held by the session
pub type NotificationSender = mpsc::UnboundedSender<Notification>;
/// Receiving half drained by the app
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Visual weight of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    /// Informational
    Default,
    /// Needs attention
    Destructive,
}

/// A transient message shown as a toast
#[derive(Debug, Clone)]
pub struct Notification {
    /// Bold first line
    pub title: String,
    /// Optional detail
    pub description: Option<String>,
    /// Styling
    pub variant: NotificationVariant,
    /// When it was raised
    pub created_at: Instant,
    /// Time until it expires
    pub duration: Duration,
}

impl Notification {
    /// A notification with the default duration
    pub fn new(title: impl Into<String>, variant: NotificationVariant) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant,
            created_at: Instant::now(),
            duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Informational notification
    pub fn info(title: impl Into<String>) -> Self {
        Self::new(title, NotificationVariant::Default)
    }

    /// Notification that needs attention
    pub fn destructive(title: impl Into<String>) -> Self {
        Self::new(title, NotificationVariant::Destructive)
    }

    /// Add detail text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Override the display time
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether it needs attention
    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }

    /// Whether its display time has passed
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.duration
    }
}

/// New notification channel
pub fn channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}
