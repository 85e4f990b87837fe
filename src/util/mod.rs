pub mod colors;
pub mod dirs;
pub mod hook;
pub mod log;
pub mod task;
