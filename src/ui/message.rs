use std::time::Duration;

use crate::{
    favorites::Favorites, http::error::LookupError, lyrics::LyricsResult, ui::state::Route,
};

#[derive(Debug, Clone)]
pub enum AppMessage {
    Quit,

    // Navigation
    NavigateTo(Route),
    NextView,

    // Search input
    StartEditing,
    StopEditing,
    InputChar(char),
    InputBackspace,
    ClearInput,
    SubmitSearch,

    // Favorites
    ToggleFavorite,
    LoadFavorite(String),
    RemoveFavorite(String),

    // Karaoke
    ToggleScroll,
    SpeedUp,
    SpeedDown,
    ScrollBy(i32),
    ScrollTick,
    Resize { width: u16, height: u16 },

    // Data Loaded
    LyricsLoaded {
        request_id: u64,
        result: Result<LyricsResult, LookupError>,
    },
}

/// Side effects requested by [`AppState::update`](crate::ui::state::AppState::update).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Lookup { request_id: u64, query: String },
    PersistFavorites(Favorites),
    StartTicker(Duration),
    StopTicker,
    Quit,
}
