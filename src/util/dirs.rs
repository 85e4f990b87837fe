use std::path::PathBuf;

use directories::ProjectDirs;
use lazy_static::lazy_static;

pub const DATA_DIR_ENV: &str = "LYRICS_DATA_DIR";
pub const LOG_ENV: &str = "LYRICS_LOG_LEVEL";

lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "lyricsync", env!("CARGO_PKG_NAME"))
}

/// Holds both the favorites and the log file.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok())
}

fn data_dir_from(override_dir: Option<String>) -> PathBuf {
    let override_dir = override_dir
        .map(|dir| dir.trim().to_string())
        .filter(|dir| !dir.is_empty());

    if let Some(dir) = override_dir {
        PathBuf::from(dir)
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}
