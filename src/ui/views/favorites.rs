use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    ui::{layout::panel, message::AppMessage, state::AppState, traits::View},
    util::colors,
};

#[derive(Default)]
pub struct Favorites {
    list_state: ListState,
}

impl Favorites {
    /// Keeps the selection on an existing row after deletions.
    fn clamp_selection(&mut self, len: usize) {
        match (self.list_state.selected(), len) {
            (_, 0) => self.list_state.select(None),
            (None, _) => self.list_state.select(Some(0)),
            (Some(i), len) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    fn selected_term(&self, state: &AppState) -> Option<String> {
        let index = self.list_state.selected()?;
        state
            .data
            .favorites
            .as_slice()
            .get(index)
            .map(|f| f.term.clone())
    }
}

impl View for Favorites {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        let favorites = &state.data.favorites;
        self.clamp_selection(favorites.len());

        if favorites.is_empty() {
            let hint = Paragraph::new("No favorites yet. Press f on a lyrics result to save it.")
                .style(Style::default().fg(colors::MUTED))
                .alignment(Alignment::Center)
                .block(panel().title(" Favorites "));
            f.render_widget(hint, area);
            return;
        }

        let items: Vec<ListItem> = favorites
            .iter()
            .map(|favorite| {
                let preview = favorite
                    .lyrics
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::raw(format!("  {}", favorite.term)),
                    Span::styled(
                        format!("  {}", preview),
                        Style::default().fg(colors::MUTED),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(panel().title(format!(" Favorites ({}) ", favorites.len())))
            .highlight_style(
                Style::default()
                    .fg(colors::PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn handle_input(&mut self, key: KeyEvent, state: &AppState) -> Option<AppMessage> {
        let len = state.data.favorites.len();
        self.clamp_selection(len);

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.list_state.selected().unwrap_or(0);
                if i + 1 < len {
                    self.list_state.select(Some(i + 1));
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.list_state.selected().unwrap_or(0);
                self.list_state.select(Some(i.saturating_sub(1)));
                None
            }
            KeyCode::Enter => self.selected_term(state).map(AppMessage::LoadFavorite),
            KeyCode::Char('d') | KeyCode::Delete => {
                self.selected_term(state).map(AppMessage::RemoveFavorite)
            }
            _ => None,
        }
    }
}
