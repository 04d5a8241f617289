// ABOUTME: Event handling system mapping keyboard input to keychain actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::{AppState, state::PendingAction};

/// Action requested by a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Leave the app, ending any call
    Quit,
    /// Show or hide the help overlay
    ToggleHelp,
    /// Press the SOS button
    StartCall,
    /// Hang up the current call
    EndCall,
    /// Re-read the guardian list
    ReloadGuardians,
    /// Clear every visible toast
    DismissToasts,
}

/// Stateless translator from terminal input to app events
pub struct EventHandler;

impl EventHandler {
    /// Map a key press to an event. Keys that do nothing in the current state map to `None`.
    pub fn handle_key_event(key_event: KeyEvent, state: &AppState) -> Option<AppEvent> {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Quit);
        }

        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Enter | KeyCode::Char('s') if !state.view.is_calling => Some(AppEvent::StartCall),
            KeyCode::Char('e') if state.view.is_calling || state.view.is_loading => Some(AppEvent::EndCall),
            KeyCode::Char('r') => Some(AppEvent::ReloadGuardians),
            KeyCode::Char('x') => Some(AppEvent::DismissToasts),
            _ => None,
        }
    }

    /// Apply an event. Call actions are deferred to the next `App::tick`.
    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::StartCall => {
                // Mark for processing on the next tick, where the session lives
                state.pending_action = Some(PendingAction::StartCall);
            }
            AppEvent::EndCall => {
                state.pending_action = Some(PendingAction::EndCall);
            }
            AppEvent::ReloadGuardians => {
                state.pending_action = Some(PendingAction::ReloadGuardians);
            }
            AppEvent::DismissToasts => state.toasts.clear(),
        }
    }
}
