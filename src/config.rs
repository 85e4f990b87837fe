use std::path::PathBuf;

use crate::{
    karaoke::Speed,
    util::dirs::{DATA_DIR_ENV, get_data_dir},
};

pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub speed: Speed,
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            speed: Speed::default(),
            data_dir: get_data_dir(),
        }
    }
}

impl AppConfig {
    /// Reads the process environment once. `.env` is expected to be loaded
    /// already.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_key = API_KEY_VARS.iter().find_map(|&key| var(key));
        let speed = var("KARAOKE_SPEED")
            .and_then(|s| s.parse::<u8>().ok())
            .map(Speed::new)
            .unwrap_or(defaults.speed);

        Self {
            api: ApiConfig {
                api_key,
                base_url: var("LYRICS_API_BASE").unwrap_or(defaults.api.base_url),
                model: var("LYRICS_MODEL").unwrap_or(defaults.api.model),
            },
            speed,
            data_dir: var(DATA_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
        }
    }
}
