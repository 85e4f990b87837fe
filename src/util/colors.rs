use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x00f7d44b);
pub const NEUTRAL: Color = Color::from_u32(0x00404040);
pub const MUTED: Color = Color::from_u32(0x00808080);
pub const BACKGROUND: Color = Color::from_u32(0x000d0d0d);
pub const ACCENT: Color = Color::from_u32(0x00feca88);
pub const ERROR: Color = Color::from_u32(0x00e5534b);
