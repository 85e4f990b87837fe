use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    config::API_KEY_VARS,
    ui::{layout::panel, message::AppMessage, state::AppState, traits::View},
    util::colors,
};

/// Shown instead of every view while no API key is configured.
#[derive(Default)]
pub struct ConfigError;

impl View for ConfigError {
    fn render(&mut self, f: &mut Frame, area: Rect, _state: &AppState) {
        let [_, body, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .areas(area);

        let text = vec![
            Line::styled(
                "Configuration error",
                Style::default()
                    .fg(colors::ERROR)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::raw(format!(
                "No API key found. Set {} (or {}) in the environment or in a .env file,",
                API_KEY_VARS[0], API_KEY_VARS[1]
            )),
            Line::raw("then restart the application."),
        ];

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(panel().border_style(Style::default().fg(colors::ERROR)));
        f.render_widget(paragraph, body);
    }

    fn handle_input(&mut self, _key: KeyEvent, _state: &AppState) -> Option<AppMessage> {
        None
    }
}
