use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{
    karaoke::MAX_SPEED,
    ui::state::{AppState, Route},
    util::colors,
};

/// Key hints on the left, karaoke status on the right.
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn hints(&self) -> &'static str {
        let ui = &self.state.ui;
        if ui.config_error {
            return " q quit";
        }
        match ui.route {
            Route::Search if ui.is_editing => " enter search · esc done · tab favorites",
            Route::Search => {
                " / edit · s karaoke · +/- speed · f favorite · ↑↓ scroll · tab favorites · q quit"
            }
            Route::Favorites => " enter open · d delete · ↑↓ select · tab search · q quit",
        }
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.hints())
            .style(Style::default().fg(colors::MUTED))
            .render(area, buf);

        let scroll = self.state.scroll;
        let mut spans = vec![Span::styled(
            format!("speed {}/{} ", scroll.speed.get(), MAX_SPEED),
            Style::default().fg(colors::MUTED),
        )];
        if scroll.is_scrolling() {
            spans.insert(
                0,
                Span::styled(
                    "▶ karaoke  ",
                    Style::default()
                        .fg(colors::ACCENT)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Right)
            .render(area, buf);
    }
}
