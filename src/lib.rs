pub mod config;
pub mod event;
pub mod favorites;
pub mod http;
pub mod karaoke;
pub mod lyrics;
pub mod storage;
pub mod ui;
pub mod util;
