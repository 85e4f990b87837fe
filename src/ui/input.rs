use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::{message::AppMessage, state::Route};

/// Bindings that apply whatever view is active.
pub struct InputHandler;

impl InputHandler {
    pub fn handle_key(key: KeyEvent) -> Option<AppMessage> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppMessage::Quit),
            (KeyCode::Char('q'), _) => Some(AppMessage::Quit),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Some(AppMessage::NextView),
            (KeyCode::Char('1'), _) => Some(AppMessage::NavigateTo(Route::Search)),
            (KeyCode::Char('2'), _) => Some(AppMessage::NavigateTo(Route::Favorites)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_bindings() {
        let key = |code, modifiers| KeyEvent::new(code, modifiers);
        assert!(matches!(
            InputHandler::handle_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(AppMessage::Quit)
        ));
        assert!(matches!(
            InputHandler::handle_key(key(KeyCode::Char('2'), KeyModifiers::NONE)),
            Some(AppMessage::NavigateTo(Route::Favorites))
        ));
        assert!(InputHandler::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE)).is_none());
    }
}
