// ABOUTME: Main application structure and state management for the keychain TUI

/// Key to action mapping
pub mod events;
/// UI state and the tick loop
pub mod state;

pub use events::{AppEvent, EventHandler};
pub use state::{App, AppState, PendingAction};
