use crate::{http::error::LookupError, lyrics::LyricsResult};

/// Results coming back from background tasks.
#[derive(Debug, Clone)]
pub enum Event {
    LyricsFetched {
        request_id: u64,
        result: Result<LyricsResult, LookupError>,
    },
    ScrollTick,
}
