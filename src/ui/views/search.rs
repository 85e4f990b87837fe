use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::{
    ui::{
        components::{lyrics::LyricsWidget, sources::SourcesWidget, spinner::Spinner},
        layout::{panel, search_areas},
        message::AppMessage,
        state::AppState,
        traits::View,
    },
    util::colors,
};

#[derive(Default)]
pub struct Search;

impl Search {
    fn render_input(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let input_style = if state.ui.is_editing && !state.is_loading() {
            Style::default().fg(colors::PRIMARY)
        } else {
            Style::default().fg(colors::NEUTRAL)
        };
        let title = if state.is_loading() {
            " Searching… "
        } else {
            " Song title - artist "
        };

        let mut text = state.ui.input.clone();
        if state.ui.is_editing {
            text.push('▏');
        }
        let input = Paragraph::new(text).block(panel().title(title).border_style(input_style));
        f.render_widget(input, area);
    }

    fn render_message(&self, f: &mut Frame, area: Rect, state: &AppState) {
        let line = match &state.ui.error_message {
            Some(message) => Line::styled(message.clone(), Style::default().fg(colors::ERROR)),
            None => Line::default(),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_lyrics(&self, f: &mut Frame, area: Rect, state: &AppState) {
        if state.is_loading() {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label(format!(
                    "Looking up \"{}\"...",
                    state.pending_query().unwrap_or_default()
                ));
            f.render_widget(spinner, area);
            return;
        }

        let Some(lyrics) = &state.data.lyrics else {
            let hint = Paragraph::new("Type a song and its artist, then press enter.")
                .style(Style::default().fg(colors::MUTED))
                .alignment(Alignment::Center);
            let y = area.y + area.height / 2;
            f.render_widget(hint, Rect::new(area.x, y, area.width, 1).intersection(area));
            return;
        };

        let star = if state.is_current_favorite() { "★" } else { "☆" };
        let block = panel()
            .title(Line::styled(
                format!(" {} {} ", star, lyrics.term),
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(LyricsWidget::new(lyrics, state.scroll), inner);
    }
}

impl View for Search {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let areas = search_areas(area, state);

        self.render_input(f, areas.input, state);
        self.render_message(f, areas.message, state);
        self.render_lyrics(f, areas.lyrics, state);

        if let Some(lyrics) = &state.data.lyrics {
            if !lyrics.result.sources.is_empty() && !state.is_loading() {
                f.render_widget(SourcesWidget::new(&lyrics.result.sources), areas.sources);
            }
        }
    }

    fn handle_input(&mut self, key: KeyEvent, state: &AppState) -> Option<AppMessage> {
        if state.ui.is_editing {
            return match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(AppMessage::ClearInput)
                }
                KeyCode::Enter => Some(AppMessage::SubmitSearch),
                KeyCode::Char(c) => Some(AppMessage::InputChar(c)),
                KeyCode::Backspace => Some(AppMessage::InputBackspace),
                KeyCode::Esc => Some(AppMessage::StopEditing),
                _ => None,
            };
        }

        let page = i32::from(state.ui.viewport.height.max(1));
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('i') => Some(AppMessage::StartEditing),
            KeyCode::Enter => Some(AppMessage::SubmitSearch),
            KeyCode::Char('s') | KeyCode::Char(' ') => Some(AppMessage::ToggleScroll),
            KeyCode::Char('f') => Some(AppMessage::ToggleFavorite),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(AppMessage::SpeedUp),
            KeyCode::Char('-') => Some(AppMessage::SpeedDown),
            KeyCode::Down | KeyCode::Char('j') => Some(AppMessage::ScrollBy(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(AppMessage::ScrollBy(-1)),
            KeyCode::PageDown => Some(AppMessage::ScrollBy(page)),
            KeyCode::PageUp => Some(AppMessage::ScrollBy(-page)),
            KeyCode::Home | KeyCode::Char('g') => Some(AppMessage::ScrollBy(i32::MIN)),
            KeyCode::End | KeyCode::Char('G') => Some(AppMessage::ScrollBy(i32::MAX)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{favorites::Favorites, karaoke::Speed};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn editing_captures_letters() {
        let state = AppState::new(Favorites::new(), true, Speed::default());
        assert!(state.ui.is_editing);
        let mut view = Search;
        assert!(matches!(
            view.handle_input(key(KeyCode::Char('q')), &state),
            Some(AppMessage::InputChar('q'))
        ));
        assert!(matches!(
            view.handle_input(key(KeyCode::Enter), &state),
            Some(AppMessage::SubmitSearch)
        ));
        assert!(view.handle_input(key(KeyCode::Tab), &state).is_none());
    }

    #[test]
    fn browsing_keys_drive_karaoke() {
        let mut state = AppState::new(Favorites::new(), true, Speed::default());
        state.update(AppMessage::StopEditing);
        let mut view = Search;
        assert!(matches!(
            view.handle_input(key(KeyCode::Char('s')), &state),
            Some(AppMessage::ToggleScroll)
        ));
        assert!(matches!(
            view.handle_input(key(KeyCode::Char('f')), &state),
            Some(AppMessage::ToggleFavorite)
        ));
        assert!(view.handle_input(key(KeyCode::Char('q')), &state).is_none());
    }
}
