// ABOUTME: Main layout component arranging the keychain screen, toasts and bottom menu bar

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    style::{Color, Style},
};

use crate::app::AppState;
use super::{HelpComponent, KeychainComponent, ToastComponent};

/// Widest the keychain screen gets, like a phone held upright
const SCREEN_WIDTH: u16 = 48;

/// Root component that places every other one
pub struct LayoutComponent {
    keychain: KeychainComponent,
    toasts: ToastComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    /// Layout with all child components
    pub fn new() -> Self {
        Self {
            keychain: KeychainComponent::new(),
            toasts: ToastComponent::new(),
            help: HelpComponent::new(),
        }
    }

    /// Draw a full frame
    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),     // Main content
                Constraint::Length(3),  // Bottom menu bar
            ])
            .split(frame.size());

        let content = main_chunks[0];
        let width = SCREEN_WIDTH.min(content.width);
        let screen = Rect::new(content.x + (content.width - width) / 2, content.y, width, content.height);

        self.keychain.render(frame, screen, state);
        self.toasts.render(frame, content, &state.toasts);
        self.render_menu_bar(frame, main_chunks[1], state);

        // Render help overlay if visible
        if state.help_visible {
            self.help.render(frame, frame.size());
        }
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let menu_text = if state.view.is_calling || state.view.is_loading {
            "[e]nd call [r]eload guardians [x] dismiss [?]help [q]uit"
        } else {
            "[s]OS [r]eload guardians [x] dismiss [?]help [q]uit"
        };

        let menu = Paragraph::new(menu_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
