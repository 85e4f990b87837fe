use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::ui::{message::AppMessage, state::AppState};

/// A screen. Views keep only presentation state (selection, cursor); what
/// they show comes from [`AppState`] and what they do goes out as messages.
pub trait View: Send {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState);

    /// `None` lets the key fall through to the global bindings.
    fn handle_input(&mut self, key: KeyEvent, state: &AppState) -> Option<AppMessage>;
}
