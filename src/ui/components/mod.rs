pub mod lyrics;
pub mod sidebar;
pub mod sources;
pub mod spinner;
pub mod status_bar;
