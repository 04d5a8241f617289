// ABOUTME: Help overlay component displaying keychain keyboard shortcuts

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem},
    style::{Color, Modifier, Style},
};

/// Popup listing the key bindings
pub struct HelpComponent;

impl HelpComponent {
    /// New help overlay
    pub fn new() -> Self {
        Self
    }

    /// Draw centered over `area`
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = self.centered_rect(60, 60, area);

        frame.render_widget(Clear, popup_area);

        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let help_items = vec![
            ListItem::new("Emergency Call:").style(heading),
            ListItem::new("  Enter/s    Press SOS and start a call"),
            ListItem::new("  e          End the call"),
            ListItem::new(""),
            ListItem::new("Guardians:").style(heading),
            ListItem::new("  r          Reload guardian list"),
            ListItem::new(""),
            ListItem::new("General:").style(heading),
            ListItem::new("  x          Dismiss notifications"),
            ListItem::new("  ?          Toggle this help"),
            ListItem::new("  q/Esc      Quit (ends any call)"),
            ListItem::new("  Ctrl+C     Force quit"),
        ];

        let help_list = List::new(help_items)
            .block(
                Block::default()
                    .title("Help - Press ? or Esc to close")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
            );

        frame.render_widget(help_list, popup_area);
    }

    fn centered_rect(&self, percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for HelpComponent {
    fn default() -> Self {
        Self::new()
    }
}
