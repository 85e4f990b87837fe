use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

pub const FAVORITES_KEY: &str = "lyrics-favorites";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub term: String,
    pub lyrics: String,
}

/// Saved lookups keyed by their exact search term, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    items: Vec<Favorite>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Favorite>) -> Self {
        let mut favorites = Self::new();
        for item in items {
            favorites.add(item.term, item.lyrics);
        }
        favorites
    }

    pub fn contains(&self, term: &str) -> bool {
        self.items.iter().any(|f| f.term == term)
    }

    pub fn get(&self, term: &str) -> Option<&Favorite> {
        self.items.iter().find(|f| f.term == term)
    }

    /// Returns false when the term was already saved or is blank.
    pub fn add(&mut self, term: impl Into<String>, lyrics: impl Into<String>) -> bool {
        let term = term.into();
        if term.trim().is_empty() || self.contains(&term) {
            return false;
        }
        self.items.push(Favorite {
            term,
            lyrics: lyrics.into(),
        });
        true
    }

    pub fn remove(&mut self, term: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|f| f.term != term);
        self.items.len() != before
    }

    /// Returns whether the term is a favorite afterwards.
    pub fn toggle(&mut self, term: &str, lyrics: &str) -> bool {
        if self.remove(term) {
            false
        } else {
            self.add(term, lyrics)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Favorite> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Favorite] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Persists [`Favorites`] as one JSON entry. Never fails outward: problems
/// are logged and the in-memory collection stays authoritative.
pub struct FavoritesStore {
    backend: Box<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn load_all(&self) -> Favorites {
        match self.try_load() {
            Ok(favorites) => {
                debug!("Loaded {} favorites", favorites.len());
                favorites
            }
            Err(e) => {
                warn!("Could not load favorites, starting empty: {}", e);
                Favorites::new()
            }
        }
    }

    pub fn save_all(&self, favorites: &Favorites) {
        if let Err(e) = self.try_save(favorites) {
            warn!("Could not save favorites: {}", e);
        }
    }

    fn try_load(&self) -> Result<Favorites, StorageError> {
        let Some(raw) = self.backend.get(FAVORITES_KEY)? else {
            return Ok(Favorites::new());
        };
        let items: Vec<Favorite> =
            serde_json::from_str(&raw).map_err(|source| StorageError::Malformed {
                key: FAVORITES_KEY.to_string(),
                source,
            })?;
        Ok(Favorites::from_vec(items))
    }

    fn try_save(&self, favorites: &Favorites) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(favorites.as_slice()).map_err(|source| {
                StorageError::Malformed {
                    key: FAVORITES_KEY.to_string(),
                    source,
                }
            })?;
        self.backend.set(FAVORITES_KEY, &raw)
    }
}
