pub mod config_error;
pub mod favorites;
pub mod search;

pub use config_error::ConfigError;
pub use favorites::Favorites;
pub use search::Search;
