// ABOUTME: Keychain screen component: SOS button while idle, live call panels while active

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::models::AlertLevel;
use crate::session::{AnalysisPanel, CameraPanel, KeychainView, CAMERA_DENIED};

/// The phone-sized keychain screen
pub struct KeychainComponent;

impl KeychainComponent {
    /// New keychain screen
    pub fn new() -> Self {
        Self
    }

    /// Draw the idle or call screen for the current state
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Body
            ])
            .split(area);

        self.render_header(frame, chunks[0]);

        if state.view.is_calling {
            self.render_call(frame, chunks[1], &state.view);
        } else {
            self.render_idle(frame, chunks[1], state);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let clock = chrono::Local::now().format("%H:%M").to_string();
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "🛡  Guardian",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(clock, Style::default().fg(Color::Gray)),
        ]))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);

        frame.render_widget(header, area);
    }

    fn render_idle(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let view = &state.view;
        let button = if view.is_loading {
            Span::styled(
                "  ⏳ Connecting...  ",
                Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else if view.can_start {
            Span::styled(
                "  📞  SOS  ",
                Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("  SOS  ", Style::default().fg(Color::DarkGray).bg(Color::Black))
        };

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "In Case of Emergency",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press the button to call for help",
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(button),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} guardians will be alerted", view.guardian_count),
                Style::default().fg(Color::Gray),
            )),
        ];

        if view.guardian_count == 0 {
            text.push(Line::from(Span::styled(
                "Add guardians to enable the SOS button",
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(message) = &state.status_message {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(message.clone(), Style::default().fg(Color::Yellow))));
        }

        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }

    fn render_call(&self, frame: &mut Frame, area: Rect, view: &KeychainView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // Camera
                Constraint::Length(4), // Location
                Constraint::Min(4),    // Analysis
            ])
            .split(area);

        let (camera_text, camera_style) = match view.camera {
            CameraPanel::Live => ("● LIVE 360° VIEW", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            CameraPanel::Pending => ("Connecting camera...", Style::default().fg(Color::Gray)),
            CameraPanel::Denied => (CAMERA_DENIED, Style::default().fg(Color::Yellow)),
        };
        let camera = Paragraph::new(Line::from(Span::styled(camera_text, camera_style)))
            .block(Block::default().title("Video").borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(camera, chunks[0]);

        let location = Paragraph::new(vec![
            Line::from(Span::styled("📍 Location Shared", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(view.location.clone(), Style::default().fg(Color::Gray))),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(location, chunks[1]);

        let mut analysis = vec![Line::from(Span::styled(
            "AI Safety Analysis",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        match &view.analysis {
            AnalysisPanel::Alert { level, actions } => {
                analysis.push(Line::from(Span::styled(
                    format!(" {} ", level.badge()),
                    Style::default().fg(Color::White).bg(Self::level_color(*level)),
                )));
                analysis.push(Line::from(Span::styled(actions.clone(), Style::default().fg(Color::Gray))));
            }
            other => {
                analysis.push(Line::from(Span::styled(
                    other.headline().to_string(),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
        let analysis = Paragraph::new(analysis)
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(analysis, chunks[2]);
    }

    fn level_color(level: AlertLevel) -> Color {
        match level {
            AlertLevel::Low => Color::Green,
            AlertLevel::Medium => Color::Yellow,
            AlertLevel::High => Color::Red,
        }
    }
}

impl Default for KeychainComponent {
    fn default() -> Self {
        Self::new()
    }
}
