//! Karaoke auto-scroll.
//!
//! The scroller is a pure state machine: [`advance`] takes the current
//! [`ScrollState`] and the measured [`LyricsLayout`] and returns the next
//! state. The runtime only owns a timer that feeds it ticks at
//! [`Speed::tick_period`].

use std::time::Duration;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const MIN_SPEED: u8 = 1;
pub const MAX_SPEED: u8 = 10;
pub const DEFAULT_SPEED: u8 = 5;

const BASE_PERIOD_MS: u64 = 150;
const PERIOD_STEP_MS: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Speed(u8);

impl Speed {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(MIN_SPEED, MAX_SPEED))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn faster(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    pub fn slower(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    /// 138ms at speed 1 down to 30ms at speed 10.
    pub fn tick_period(self) -> Duration {
        Duration::from_millis(BASE_PERIOD_MS - PERIOD_STEP_MS * u64::from(self.0))
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(DEFAULT_SPEED)
    }
}

/// Vertical placement of one lyrics line, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub top: u32,
    pub height: u32,
}

impl LineMetrics {
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsLayout {
    lines: Vec<LineMetrics>,
    width: u16,
    visible_height: u32,
}

impl LyricsLayout {
    pub fn new(lines: Vec<LineMetrics>, visible_height: u32) -> Self {
        Self {
            lines,
            width: 0,
            visible_height,
        }
    }

    /// Lays the lines out top to bottom, each one wrapped to `width` columns.
    pub fn measure<S: AsRef<str>>(lines: &[S], width: u16, visible_height: u16) -> Self {
        let mut top = 0;
        let metrics = lines
            .iter()
            .map(|line| {
                let height = wrap_line(line.as_ref(), usize::from(width)).len() as u32;
                let metrics = LineMetrics { top, height };
                top += height;
                metrics
            })
            .collect();

        Self {
            lines: metrics,
            width,
            visible_height: u32::from(visible_height),
        }
    }

    /// Same rows in a taller or shorter viewport. Wrapping only depends on
    /// the width, so nothing is re-measured.
    pub fn with_visible_height(self, visible_height: u16) -> Self {
        Self {
            visible_height: u32::from(visible_height),
            ..self
        }
    }

    pub fn lines(&self) -> &[LineMetrics] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn visible_height(&self) -> u32 {
        self.visible_height
    }

    pub fn content_height(&self) -> u32 {
        self.lines.last().map(LineMetrics::bottom).unwrap_or(0)
    }

    pub fn max_offset(&self) -> u32 {
        self.content_height().saturating_sub(self.visible_height)
    }

    /// The line being "sung" when the viewport starts at `offset`.
    ///
    /// The active zone sits a quarter of the viewport below the top edge, so
    /// the highlight leads the reader slightly above center.
    pub fn active_line_at(&self, offset: u32) -> Option<usize> {
        let threshold = offset + self.visible_height / 4;
        self.lines
            .iter()
            .position(|line| line.bottom() > threshold)
            .or_else(|| self.lines.len().checked_sub(1))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Scrolling,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub phase: Phase,
    pub speed: Speed,
    pub offset: u32,
    pub active_line: Option<usize>,
}

impl ScrollState {
    pub fn new(speed: Speed) -> Self {
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.phase == Phase::Scrolling
    }

    /// Starting requires lyrics on screen; stopping is always allowed.
    pub fn toggle(self, has_lyrics: bool) -> Self {
        match self.phase {
            Phase::Scrolling => self.stop(),
            Phase::Idle if has_lyrics => Self {
                phase: Phase::Scrolling,
                ..self
            },
            Phase::Idle => self,
        }
    }

    /// Freezes the offset where it is.
    pub fn stop(self) -> Self {
        Self {
            phase: Phase::Idle,
            active_line: None,
            ..self
        }
    }

    /// Back to the top, for new content. Speed is a user preference and stays.
    pub fn reset(self) -> Self {
        Self::new(self.speed)
    }

    pub fn with_speed(self, speed: Speed) -> Self {
        Self { speed, ..self }
    }

    /// Manual scrolling, only honoured while idle.
    pub fn scroll_by(self, delta: i32, layout: &LyricsLayout) -> Self {
        if self.is_scrolling() {
            return self;
        }
        let offset = (i64::from(self.offset) + i64::from(delta))
            .clamp(0, i64::from(layout.max_offset())) as u32;
        Self { offset, ..self }
    }

    /// Re-fits the state after the layout was re-measured.
    pub fn clamp_to(self, layout: &LyricsLayout) -> Self {
        Self {
            offset: self.offset.min(layout.max_offset()),
            active_line: self.active_line.filter(|&i| i < layout.len()),
            ..self
        }
    }
}

/// Applies `ticks` scroll ticks. Ticks on an idle state do nothing.
pub fn advance(state: ScrollState, layout: &LyricsLayout, ticks: u32) -> ScrollState {
    let mut state = state;
    for _ in 0..ticks {
        if !state.is_scrolling() {
            break;
        }
        state = tick(state, layout);
    }
    state
}

fn tick(state: ScrollState, layout: &LyricsLayout) -> ScrollState {
    if state.offset >= layout.max_offset() {
        return state.stop();
    }

    let offset = state.offset + 1;
    let active_line = match layout.active_line_at(offset) {
        Some(index) if index < layout.len() && Some(index) != state.active_line => Some(index),
        _ => state.active_line,
    };

    ScrollState {
        offset,
        active_line,
        ..state
    }
}

const TAB: &str = "    ";

/// Greedy word wrap by display width. Indentation and runs of spaces between
/// words are kept; the whitespace at a row break is dropped. Words wider than
/// a row are split. A blank line still takes one row.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let text = text.trim_end().replace('\t', TAB);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut gap = "";

    for (is_space, segment) in segments(&text) {
        if is_space {
            gap = segment;
            continue;
        }
        let gap_width = gap.width();
        let word_width = segment.width();

        if current_width + gap_width + word_width <= width {
            current.push_str(gap);
            current.push_str(segment);
            current_width += gap_width + word_width;
            gap = "";
            continue;
        }
        gap = "";
        if current_width > 0 {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if word_width <= width {
            current.push_str(segment);
            current_width = word_width;
            continue;
        }

        for ch in segment.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width > 0 && current_width + ch_width > width {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// Alternating runs of whitespace and non-whitespace, flagged by kind.
fn segments(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = rest
            .find(|c: char| c.is_whitespace() != is_space)
            .unwrap_or(rest.len());
        let (segment, tail) = rest.split_at(end);
        rest = tail;
        Some((is_space, segment))
    })
}
