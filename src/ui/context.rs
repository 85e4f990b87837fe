use std::sync::Arc;

use flume::Sender;

use crate::{event::events::Event, favorites::FavoritesStore, http::LyricsLookup};

/// Services the runtime needs to carry out commands.
pub struct AppContext {
    pub api: Arc<dyn LyricsLookup>,
    pub favorites: FavoritesStore,
    pub event_tx: Sender<Event>,
}
