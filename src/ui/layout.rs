use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::border,
    widgets::{Block, Borders},
};

use crate::{
    ui::{
        app::App,
        components::{sidebar::Sidebar, status_bar::StatusBar},
        state::AppState,
    },
    util::colors,
};

const SIDEBAR_WIDTH: u16 = 24;
const MAX_SOURCES_HEIGHT: u16 = 6;

pub struct AppAreas {
    pub sidebar: Rect,
    pub content: Rect,
    pub status: Rect,
}

pub struct SearchAreas {
    pub input: Rect,
    pub message: Rect,
    pub lyrics: Rect,
    pub sources: Rect,
}

pub fn panel<'a>() -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
}

pub fn app_areas(area: Rect) -> AppAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(chunks[0]);

    AppAreas {
        sidebar: main_chunks[0],
        content: main_chunks[1],
        status: chunks[1],
    }
}

pub fn search_areas(area: Rect, state: &AppState) -> SearchAreas {
    let sources = state
        .data
        .lyrics
        .as_ref()
        .map(|l| l.result.sources.len())
        .unwrap_or(0);
    let sources_height = if sources == 0 {
        0
    } else {
        (sources as u16).saturating_add(2).min(MAX_SOURCES_HEIGHT)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(sources_height),
        ])
        .split(area);

    SearchAreas {
        input: chunks[0],
        message: chunks[1],
        lyrics: chunks[2],
        sources: chunks[3],
    }
}

/// The rows the karaoke scroller moves through, for a terminal of `area`.
pub fn lyrics_viewport(area: Rect, state: &AppState) -> Rect {
    let content = panel().inner(app_areas(area).content);
    panel().inner(search_areas(content, state).lyrics)
}

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        let buf = f.buffer_mut();
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));

        let areas = app_areas(area);
        let sidebar_block = panel()
            .title(env!("CARGO_PKG_NAME"))
            .title_alignment(Alignment::Center);
        let content_block = panel();

        let sidebar_inner = sidebar_block.inner(areas.sidebar);
        let content_inner = content_block.inner(areas.content);

        f.render_widget(sidebar_block, areas.sidebar);
        f.render_widget(content_block, areas.content);

        let state = &self.app.state;
        let favorites_label = format!("Favorites ({})", state.data.favorites.len());
        f.render_widget(
            Sidebar::new(
                vec!["Search", favorites_label.as_str()],
                state.ui.route.index(),
                !state.ui.config_error,
            ),
            sidebar_inner,
        );
        f.render_widget(StatusBar::new(state), areas.status);

        self.app.router.render(f, content_inner, &self.app.state);
    }
}
