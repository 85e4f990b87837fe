use ratatui::Frame;
use ratatui::crossterm::event::KeyEvent;
use ratatui::layout::Rect;

use crate::ui::{
    message::AppMessage,
    state::{AppState, Route},
    traits::View,
};

/// One view per [`Route`], indexed by [`Route::index`], plus an optional
/// overlay that preempts all of them.
pub struct Router {
    views: Vec<Box<dyn View>>,
    overlay: Option<Box<dyn View>>,
}

impl Router {
    pub fn new(views: Vec<Box<dyn View>>) -> Self {
        Self {
            views,
            overlay: None,
        }
    }

    pub fn set_overlay(&mut self, view: Box<dyn View>) {
        self.overlay = Some(view);
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    fn active_view(&mut self, route: Route) -> Option<&mut Box<dyn View>> {
        if self.overlay.is_some() {
            self.overlay.as_mut()
        } else {
            self.views.get_mut(route.index())
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState) {
        if let Some(view) = self.active_view(state.ui.route) {
            view.render(f, area, state);
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent, state: &AppState) -> Option<AppMessage> {
        self.active_view(state.ui.route)
            .and_then(|view| view.handle_input(key, state))
    }
}
