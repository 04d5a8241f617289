// ABOUTME: Toast overlay rendering unexpired notifications in the top-right corner

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::notification::{Notification, NotificationVariant};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

/// Stack of notification toasts
pub struct ToastComponent;

impl ToastComponent {
    /// New toast stack
    pub fn new() -> Self {
        Self
    }

    /// Draw toasts in the top-right corner of `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, toasts: &[Notification]) {
        let width = TOAST_WIDTH.min(area.width);
        let mut y = area.y + 1;

        // Newest first
        for toast in toasts.iter().rev() {
            if y + TOAST_HEIGHT > area.y + area.height {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, TOAST_HEIGHT);
            self.render_toast(frame, rect, toast);
            y += TOAST_HEIGHT;
        }
    }

    fn render_toast(&self, frame: &mut Frame, area: Rect, toast: &Notification) {
        let color = match toast.variant {
            NotificationVariant::Default => Color::Cyan,
            NotificationVariant::Destructive => Color::Red,
        };

        let mut lines = vec![Line::from(Span::styled(
            toast.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(description) = &toast.description {
            lines.push(Line::from(description.clone()));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)))
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }
}

impl Default for ToastComponent {
    fn default() -> Self {
        Self::new()
    }
}
