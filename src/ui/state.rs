use tracing::{debug, info, warn};

use crate::{
    favorites::Favorites,
    http::error::LookupError,
    karaoke::{LyricsLayout, ScrollState, Speed, advance},
    lyrics::LyricsResult,
    ui::message::{AppMessage, Command},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Search,
    Favorites,
}

impl Route {
    pub fn next(self) -> Self {
        match self {
            Route::Search => Route::Favorites,
            Route::Favorites => Route::Search,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Route::Search => 0,
            Route::Favorites => 1,
        }
    }
}

/// Lyrics currently on screen, with the layout they were measured at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedLyrics {
    pub term: String,
    pub result: LyricsResult,
    pub layout: LyricsLayout,
}

#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub favorites: Favorites,
    pub lyrics: Option<DisplayedLyrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub route: Route,
    pub config_error: bool,
    pub is_editing: bool,
    pub input: String,
    pub error_message: Option<String>,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Default)]
struct Requests {
    last_id: u64,
    pending: Option<(u64, String)>,
}

impl Requests {
    fn begin(&mut self, query: String) -> u64 {
        self.last_id += 1;
        self.pending = Some((self.last_id, query));
        self.last_id
    }

    /// The query of `request_id` if it is still the one being waited for.
    fn finish(&mut self, request_id: u64) -> Option<String> {
        match self.pending.take() {
            Some((id, query)) if id == request_id => Some(query),
            other => {
                self.pending = other;
                None
            }
        }
    }

    fn abandon(&mut self) {
        if let Some((id, query)) = self.pending.take() {
            debug!("Abandoning lookup #{} for '{}'", id, query);
        }
    }
}

/// Everything the UI shows. Mutated only through [`AppState::update`].
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub data: AppData,
    pub ui: UiState,
    pub scroll: ScrollState,
    requests: Requests,
}

impl AppState {
    pub fn new(favorites: Favorites, has_credential: bool, speed: Speed) -> Self {
        if !has_credential {
            warn!("No API key configured, search is disabled");
        }
        Self {
            data: AppData {
                favorites,
                lyrics: None,
            },
            ui: UiState {
                config_error: !has_credential,
                is_editing: has_credential,
                ..UiState::default()
            },
            scroll: ScrollState::new(speed),
            requests: Requests::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.requests.pending.is_some()
    }

    pub fn pending_query(&self) -> Option<&str> {
        self.requests.pending.as_ref().map(|(_, q)| q.as_str())
    }

    pub fn is_current_favorite(&self) -> bool {
        self.data
            .lyrics
            .as_ref()
            .is_some_and(|l| self.data.favorites.contains(&l.term))
    }

    pub fn update(&mut self, msg: AppMessage) -> Vec<Command> {
        match msg {
            AppMessage::Quit => vec![Command::Quit],
            AppMessage::NavigateTo(route) => self.navigate(route),
            AppMessage::NextView => self.navigate(self.ui.route.next()),
            AppMessage::StartEditing => {
                self.ui.is_editing = true;
                vec![]
            }
            AppMessage::StopEditing => {
                self.ui.is_editing = false;
                vec![]
            }
            AppMessage::InputChar(c) => {
                self.ui.input.push(c);
                vec![]
            }
            AppMessage::InputBackspace => {
                self.ui.input.pop();
                vec![]
            }
            AppMessage::ClearInput => {
                self.ui.input.clear();
                vec![]
            }
            AppMessage::SubmitSearch => self.submit_search(),
            AppMessage::LyricsLoaded { request_id, result } => {
                self.apply_lookup(request_id, result)
            }
            AppMessage::ToggleFavorite => self.toggle_favorite(),
            AppMessage::LoadFavorite(term) => self.load_favorite(&term),
            AppMessage::RemoveFavorite(term) => self.remove_favorite(&term),
            AppMessage::ToggleScroll => self.toggle_scroll(),
            AppMessage::SpeedUp => self.set_speed(self.scroll.speed.faster()),
            AppMessage::SpeedDown => self.set_speed(self.scroll.speed.slower()),
            AppMessage::ScrollBy(delta) => {
                if let Some(lyrics) = &self.data.lyrics {
                    self.scroll = self.scroll.scroll_by(delta, &lyrics.layout);
                }
                vec![]
            }
            AppMessage::ScrollTick => self.on_tick(),
            AppMessage::Resize { width, height } => {
                self.resize(Viewport { width, height });
                vec![]
            }
        }
    }

    fn navigate(&mut self, route: Route) -> Vec<Command> {
        if self.ui.config_error || route == self.ui.route {
            return vec![];
        }
        if route != Route::Search {
            self.requests.abandon();
        }
        self.ui.route = route;
        self.ui.is_editing = false;
        vec![]
    }

    fn submit_search(&mut self) -> Vec<Command> {
        if self.ui.config_error {
            warn!("Search ignored, no API key configured");
            return vec![];
        }
        if self.is_loading() {
            return vec![];
        }

        let query = self.ui.input.trim().to_string();
        if query.is_empty() {
            self.ui.error_message = Some(LookupError::EmptyQuery.user_message());
            return vec![];
        }

        let mut commands = self.reset_scroll();
        self.data.lyrics = None;
        self.ui.error_message = None;
        self.ui.is_editing = false;

        let request_id = self.requests.begin(query.clone());
        info!("Searching lyrics #{} for '{}'", request_id, query);
        commands.push(Command::Lookup { request_id, query });
        commands
    }

    fn apply_lookup(
        &mut self,
        request_id: u64,
        result: Result<LyricsResult, LookupError>,
    ) -> Vec<Command> {
        let Some(query) = self.requests.finish(request_id) else {
            debug!("Discarding stale lookup #{}", request_id);
            return vec![];
        };

        match result {
            Ok(lyrics) if !lyrics.is_empty() => self.show_lyrics(query, lyrics),
            Ok(_) => {
                self.ui.error_message = Some(LookupError::NotFound(query).user_message());
                vec![]
            }
            Err(e) => {
                if e == LookupError::Config {
                    self.ui.config_error = true;
                }
                self.ui.error_message = Some(e.user_message());
                vec![]
            }
        }
    }

    fn show_lyrics(&mut self, term: String, result: LyricsResult) -> Vec<Command> {
        let commands = self.reset_scroll();
        let layout = LyricsLayout::measure(
            &result.lines,
            self.ui.viewport.width,
            self.ui.viewport.height,
        );
        self.data.lyrics = Some(DisplayedLyrics {
            term,
            result,
            layout,
        });
        commands
    }

    fn toggle_favorite(&mut self) -> Vec<Command> {
        let Some(lyrics) = &self.data.lyrics else {
            return vec![];
        };
        let saved = self
            .data
            .favorites
            .toggle(&lyrics.term, &lyrics.result.text());
        debug!("Favorite '{}' is now {}", lyrics.term, saved);
        vec![Command::PersistFavorites(self.data.favorites.clone())]
    }

    fn load_favorite(&mut self, term: &str) -> Vec<Command> {
        if self.ui.config_error {
            return vec![];
        }
        let Some(favorite) = self.data.favorites.get(term).cloned() else {
            return vec![];
        };

        self.requests.abandon();
        self.ui.route = Route::Search;
        self.ui.is_editing = false;
        self.ui.error_message = None;
        self.ui.input = favorite.term.clone();
        self.show_lyrics(
            favorite.term,
            LyricsResult::from_text(&favorite.lyrics, Vec::new()),
        )
    }

    fn remove_favorite(&mut self, term: &str) -> Vec<Command> {
        if self.data.favorites.remove(term) {
            vec![Command::PersistFavorites(self.data.favorites.clone())]
        } else {
            vec![]
        }
    }

    fn toggle_scroll(&mut self) -> Vec<Command> {
        let before = self.scroll;
        self.scroll = before.toggle(self.data.lyrics.is_some());
        match (before.is_scrolling(), self.scroll.is_scrolling()) {
            (false, true) => vec![Command::StartTicker(self.scroll.speed.tick_period())],
            (true, false) => vec![Command::StopTicker],
            _ => vec![],
        }
    }

    fn set_speed(&mut self, speed: Speed) -> Vec<Command> {
        self.scroll = self.scroll.with_speed(speed);
        if self.scroll.is_scrolling() {
            vec![Command::StartTicker(speed.tick_period())]
        } else {
            vec![]
        }
    }

    fn on_tick(&mut self) -> Vec<Command> {
        if !self.scroll.is_scrolling() {
            return vec![];
        }
        let next = match &self.data.lyrics {
            Some(lyrics) => advance(self.scroll, &lyrics.layout, 1),
            None => self.scroll.stop(),
        };
        self.scroll = next;
        if next.is_scrolling() {
            vec![]
        } else {
            debug!("Karaoke reached the end at offset {}", next.offset);
            vec![Command::StopTicker]
        }
    }

    fn reset_scroll(&mut self) -> Vec<Command> {
        let was_scrolling = self.scroll.is_scrolling();
        self.scroll = self.scroll.reset();
        if was_scrolling {
            vec![Command::StopTicker]
        } else {
            vec![]
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport == self.ui.viewport {
            return;
        }
        self.ui.viewport = viewport;
        if let Some(lyrics) = &mut self.data.lyrics {
            lyrics.layout = if lyrics.layout.width() == viewport.width {
                std::mem::take(&mut lyrics.layout).with_visible_height(viewport.height)
            } else {
                LyricsLayout::measure(&lyrics.result.lines, viewport.width, viewport.height)
            };
            self.scroll = self.scroll.clamp_to(&lyrics.layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{http::error::TransportKind, karaoke::Phase};

    fn lines(count: usize) -> LyricsResult {
        let text = (1..=count)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        LyricsResult::from_text(&text, Vec::new())
    }

    fn ready() -> AppState {
        let mut state = AppState::new(Favorites::new(), true, Speed::default());
        state.update(AppMessage::Resize {
            width: 40,
            height: 8,
        });
        state
    }

    fn type_query(state: &mut AppState, query: &str) {
        state.update(AppMessage::ClearInput);
        for c in query.chars() {
            state.update(AppMessage::InputChar(c));
        }
    }

    fn search(state: &mut AppState, query: &str) -> u64 {
        type_query(state, query);
        match state.update(AppMessage::SubmitSearch).as_slice() {
            [.., Command::Lookup { request_id, .. }] => *request_id,
            other => panic!("expected a lookup, got {other:?}"),
        }
    }

    fn found(state: &mut AppState, query: &str, count: usize) {
        let request_id = search(state, query);
        state.update(AppMessage::LyricsLoaded {
            request_id,
            result: Ok(lines(count)),
        });
    }

    fn start_scrolling(state: &mut AppState) {
        assert_eq!(
            state.update(AppMessage::ToggleScroll),
            vec![Command::StartTicker(state.scroll.speed.tick_period())]
        );
        for _ in 0..5 {
            state.update(AppMessage::ScrollTick);
        }
        assert!(state.scroll.is_scrolling());
        assert!(state.scroll.offset > 0);
    }

    #[test]
    fn found_lyrics_are_displayed() {
        let mut state = ready();
        let request_id = search(&mut state, "Imagine - John Lennon");
        assert!(state.is_loading());
        assert_eq!(state.pending_query(), Some("Imagine - John Lennon"));

        state.update(AppMessage::LyricsLoaded {
            request_id,
            result: Ok(lines(20)),
        });

        let lyrics = state.data.lyrics.as_ref().unwrap();
        assert_eq!(lyrics.result.lines.len(), 20);
        assert_eq!(lyrics.layout.len(), 20);
        assert_eq!(lyrics.term, "Imagine - John Lennon");
        assert!(!state.is_loading());
        assert_eq!(state.ui.error_message, None);
        assert!(!state.is_current_favorite());
    }

    #[test]
    fn whitespace_query_makes_no_request() {
        let mut state = ready();
        type_query(&mut state, "   ");
        assert!(state.update(AppMessage::SubmitSearch).is_empty());
        assert!(!state.is_loading());
        assert_eq!(
            state.ui.error_message.as_deref(),
            Some("Please enter a song title and artist.")
        );
    }

    #[test]
    fn not_found_shows_message_without_lyrics() {
        let mut state = ready();
        let request_id = search(&mut state, "asdkjhasd");
        state.update(AppMessage::LyricsLoaded {
            request_id,
            result: Err(LookupError::NotFound("asdkjhasd".into())),
        });

        assert!(state.data.lyrics.is_none());
        assert!(
            state
                .ui
                .error_message
                .as_deref()
                .unwrap()
                .contains("Could not find lyrics for \"asdkjhasd\"")
        );
    }

    #[test]
    fn transport_failure_shows_generic_message() {
        let mut state = ready();
        let request_id = search(&mut state, "song");
        state.update(AppMessage::LyricsLoaded {
            request_id,
            result: Err(LookupError::transport(
                TransportKind::InvalidCredential,
                "HTTP 400",
            )),
        });
        let message = state.ui.error_message.unwrap();
        assert!(message.starts_with("Something went wrong"));
        assert!(message.contains("API key is not valid"));
    }

    #[test]
    fn missing_credential_blocks_everything() {
        let mut favorites = Favorites::new();
        favorites.add("saved", "text");
        let mut state = AppState::new(favorites, false, Speed::default());
        assert!(state.ui.config_error);

        type_query(&mut state, "Imagine");
        assert!(state.update(AppMessage::SubmitSearch).is_empty());
        assert!(!state.is_loading());

        state.update(AppMessage::NavigateTo(Route::Favorites));
        state.update(AppMessage::NextView);
        assert_eq!(state.ui.route, Route::Search);

        assert!(state.update(AppMessage::LoadFavorite("saved".into())).is_empty());
        assert!(state.data.lyrics.is_none());

        assert_eq!(state.update(AppMessage::Quit), vec![Command::Quit]);
    }

    #[test]
    fn submit_is_ignored_while_loading() {
        let mut state = ready();
        search(&mut state, "first");
        type_query(&mut state, "second");
        assert!(state.update(AppMessage::SubmitSearch).is_empty());
        assert_eq!(state.pending_query(), Some("first"));
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut state = ready();
        let first = search(&mut state, "first");
        state.update(AppMessage::LyricsLoaded {
            request_id: first,
            result: Err(LookupError::NotFound("first".into())),
        });
        let second = search(&mut state, "second");
        assert_ne!(first, second);

        state.update(AppMessage::LyricsLoaded {
            request_id: first,
            result: Ok(lines(3)),
        });
        assert!(state.data.lyrics.is_none());
        assert!(state.is_loading());

        state.update(AppMessage::LyricsLoaded {
            request_id: second,
            result: Ok(lines(4)),
        });
        assert_eq!(state.data.lyrics.as_ref().unwrap().term, "second");
    }

    #[test]
    fn navigating_away_abandons_the_lookup() {
        let mut state = ready();
        let request_id = search(&mut state, "song");
        state.update(AppMessage::NavigateTo(Route::Favorites));
        assert!(!state.is_loading());

        state.update(AppMessage::LyricsLoaded {
            request_id,
            result: Ok(lines(5)),
        });
        assert!(state.data.lyrics.is_none());
    }

    #[test]
    fn loading_a_favorite_abandons_the_lookup() {
        let mut state = ready();
        found(&mut state, "saved", 10);
        state.update(AppMessage::ToggleFavorite);

        let request_id = search(&mut state, "other");
        state.update(AppMessage::LoadFavorite("saved".into()));
        state.update(AppMessage::LyricsLoaded {
            request_id,
            result: Ok(lines(3)),
        });

        let lyrics = state.data.lyrics.as_ref().unwrap();
        assert_eq!(lyrics.term, "saved");
        assert_eq!(lyrics.result.lines.len(), 10);
        assert_eq!(state.ui.input, "saved");
    }

    #[test]
    fn scroll_needs_lyrics() {
        let mut state = ready();
        assert!(state.update(AppMessage::ToggleScroll).is_empty());
        assert_eq!(state.scroll.phase, Phase::Idle);
    }

    #[test]
    fn new_search_while_scrolling_resets() {
        let mut state = ready();
        found(&mut state, "song", 40);
        start_scrolling(&mut state);

        type_query(&mut state, "next song");
        let commands = state.update(AppMessage::SubmitSearch);
        assert_eq!(commands[0], Command::StopTicker);
        assert_eq!(state.scroll.phase, Phase::Idle);
        assert_eq!(state.scroll.offset, 0);
        assert_eq!(state.scroll.active_line, None);
        assert!(state.data.lyrics.is_none());
    }

    #[test]
    fn loading_favorite_while_scrolling_resets() {
        let mut state = ready();
        found(&mut state, "song", 40);
        state.update(AppMessage::ToggleFavorite);
        start_scrolling(&mut state);

        state.update(AppMessage::NavigateTo(Route::Favorites));
        let commands = state.update(AppMessage::LoadFavorite("song".into()));
        assert_eq!(commands, vec![Command::StopTicker]);
        assert_eq!(state.ui.route, Route::Search);
        assert_eq!(state.scroll.phase, Phase::Idle);
        assert_eq!(state.scroll.offset, 0);
    }

    #[test]
    fn ticks_run_to_the_end_and_stop_the_ticker() {
        let mut state = ready();
        found(&mut state, "song", 20);
        state.update(AppMessage::ToggleScroll);

        let mut stopped = false;
        for _ in 0..100 {
            if state.update(AppMessage::ScrollTick) == vec![Command::StopTicker] {
                stopped = true;
                break;
            }
            let active = state.scroll.active_line.unwrap();
            assert!(active < 20);
        }
        assert!(stopped);
        assert_eq!(state.scroll.offset, 12);
        assert_eq!(state.scroll.active_line, None);
        assert!(state.update(AppMessage::ScrollTick).is_empty());
    }

    #[test]
    fn speed_change_restarts_running_ticker_only() {
        let mut state = ready();
        assert!(state.update(AppMessage::SpeedUp).is_empty());
        assert_eq!(state.scroll.speed, Speed::new(6));

        found(&mut state, "song", 40);
        state.update(AppMessage::ToggleScroll);
        assert_eq!(
            state.update(AppMessage::SpeedDown),
            vec![Command::StartTicker(Speed::new(5).tick_period())]
        );
    }

    #[test]
    fn favorite_toggle_persists_each_time() {
        let mut state = ready();
        assert!(state.update(AppMessage::ToggleFavorite).is_empty());

        found(&mut state, "song", 3);
        let added = state.update(AppMessage::ToggleFavorite);
        assert!(state.is_current_favorite());
        assert_eq!(added, vec![Command::PersistFavorites(state.data.favorites.clone())]);
        assert_eq!(
            state.data.favorites.get("song").unwrap().lyrics,
            "line 1\nline 2\nline 3"
        );

        state.update(AppMessage::ToggleFavorite);
        assert!(!state.is_current_favorite());
        assert!(state.data.favorites.is_empty());
    }

    #[test]
    fn removing_unknown_favorite_is_noop() {
        let mut state = ready();
        assert!(state.update(AppMessage::RemoveFavorite("ghost".into())).is_empty());
    }

    #[test]
    fn resize_remeasures_and_clamps() {
        let mut state = ready();
        found(&mut state, "song", 20);
        state.update(AppMessage::ScrollBy(100));
        assert_eq!(state.scroll.offset, 12);

        state.update(AppMessage::Resize {
            width: 40,
            height: 16,
        });
        let lyrics = state.data.lyrics.as_ref().unwrap();
        assert_eq!(lyrics.layout.visible_height(), 16);
        assert_eq!(lyrics.layout.width(), 40);
        assert_eq!(state.scroll.offset, 4);
    }

    #[test]
    fn narrower_viewport_rewraps_lines() {
        let mut state = ready();
        found(&mut state, "song", 20);
        assert_eq!(state.data.lyrics.as_ref().unwrap().layout.content_height(), 20);

        // "line 10" and up no longer fit on one row
        state.update(AppMessage::Resize {
            width: 6,
            height: 8,
        });
        let layout = &state.data.lyrics.as_ref().unwrap().layout;
        assert_eq!(layout.width(), 6);
        assert_eq!(layout.content_height(), 9 + 11 * 2);
    }
}
