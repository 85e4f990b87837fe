use ratatui::crossterm::event::KeyEvent;
use tracing::debug;

use crate::{
    event::events::Event,
    ui::{
        app::App,
        input::InputHandler,
        message::AppMessage,
        state::Route,
        tui::{TerminalEvent, Tui},
    },
};

pub struct EventHandler;

impl EventHandler {
    /// Waits for the next terminal or background event and applies it.
    /// Returns whether a redraw is due.
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let terminal_rx = tui.event_rx.clone();
        let event_rx = app.event_rx.clone();
        tokio::select! {
            Ok(evt) = terminal_rx.recv_async() => Self::handle_event(app, evt, tui),
            Ok(evt) = event_rx.recv_async() => {
                Self::handle_action(app, evt);
                while let Ok(evt) = app.event_rx.try_recv() {
                    Self::handle_action(app, evt);
                }
                Ok(true)
            }
            else => {
                debug!("All event sources closed");
                app.should_quit = true;
                Ok(false)
            }
        }
    }

    pub fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key),
            TerminalEvent::Paste(text) => Self::handle_paste(app, &text),
            TerminalEvent::Resize(_, _) => {}
            TerminalEvent::Tick => return Ok(app.has_focus),
        }

        Ok(true)
    }

    pub fn handle_action(app: &mut App, evt: Event) {
        match evt {
            Event::LyricsFetched { request_id, result } => {
                app.update(AppMessage::LyricsLoaded { request_id, result });
            }
            Event::ScrollTick => app.update(AppMessage::ScrollTick),
        }
    }

    fn handle_key_event(app: &mut App, key: KeyEvent) {
        if let Some(msg) = app.router.handle_input(key, &app.state) {
            app.update(msg);
            return;
        }

        if let Some(msg) = InputHandler::handle_key(key) {
            app.update(msg);
        }
    }

    fn handle_paste(app: &mut App, text: &str) {
        let ui = &app.state.ui;
        if ui.config_error || ui.route != Route::Search || !ui.is_editing {
            return;
        }
        for c in text.chars().filter(|c| !c.is_control()) {
            app.update(AppMessage::InputChar(c));
        }
    }
}
