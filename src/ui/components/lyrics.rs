use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    karaoke::{ScrollState, wrap_line},
    ui::state::DisplayedLyrics,
    util::colors,
};

/// Lyrics window at the scroll offset, centered like a karaoke screen.
pub struct LyricsWidget<'a> {
    lyrics: &'a DisplayedLyrics,
    scroll: ScrollState,
}

impl<'a> LyricsWidget<'a> {
    pub fn new(lyrics: &'a DisplayedLyrics, scroll: ScrollState) -> Self {
        Self { lyrics, scroll }
    }

    fn line_style(&self, index: usize) -> Style {
        match self.scroll.active_line {
            Some(active) if index == active => Style::default()
                .fg(colors::ACCENT)
                .add_modifier(Modifier::BOLD),
            Some(active) if index < active => Style::default().fg(colors::MUTED),
            _ => Style::default(),
        }
    }
}

impl<'a> Widget for LyricsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let top = self.scroll.offset;
        let bottom = top + u32::from(area.height);
        let layout = &self.lyrics.layout;

        for (index, (text, metrics)) in self
            .lyrics
            .result
            .lines
            .iter()
            .zip(layout.lines())
            .enumerate()
        {
            if metrics.bottom() <= top {
                continue;
            }
            if metrics.top >= bottom {
                break;
            }

            let style = self.line_style(index);
            for (row, segment) in wrap_line(text, usize::from(area.width)).iter().enumerate() {
                let row_top = metrics.top + row as u32;
                if row_top < top || row_top >= bottom {
                    continue;
                }
                let width = segment.width() as u16;
                let x = area.x + area.width.saturating_sub(width) / 2;
                let y = area.y + (row_top - top) as u16;
                buf.set_stringn(x, y, segment, area.width as usize, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{karaoke::LyricsLayout, lyrics::LyricsResult};

    fn displayed(text: &str, area: Rect) -> DisplayedLyrics {
        let result = LyricsResult::from_text(text, Vec::new());
        let layout = LyricsLayout::measure(&result.lines, area.width, area.height);
        DisplayedLyrics {
            term: "song".into(),
            result,
            layout,
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
            .trim()
            .to_string()
    }

    #[test]
    fn renders_window_from_offset() {
        let area = Rect::new(0, 0, 10, 3);
        let lyrics = displayed("one\ntwo\nthree\nfour\nfive", area);
        let scroll = ScrollState {
            offset: 2,
            ..ScrollState::default()
        };

        let mut buf = Buffer::empty(area);
        LyricsWidget::new(&lyrics, scroll).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "three");
        assert_eq!(row(&buf, 1), "four");
        assert_eq!(row(&buf, 2), "five");
    }

    #[test]
    fn active_line_is_highlighted() {
        let area = Rect::new(0, 0, 10, 3);
        let lyrics = displayed("one\ntwo\nthree", area);
        let scroll = ScrollState {
            active_line: Some(1),
            ..ScrollState::default()
        };

        let mut buf = Buffer::empty(area);
        LyricsWidget::new(&lyrics, scroll).render(area, &mut buf);

        let x = (0..area.width).find(|&x| buf[(x, 1)].symbol() == "t").unwrap();
        assert_eq!(buf[(x, 1)].fg, colors::ACCENT);
        assert!(buf[(x, 1)].modifier.contains(Modifier::BOLD));
        let x = (0..area.width).find(|&x| buf[(x, 0)].symbol() == "o").unwrap();
        assert_eq!(buf[(x, 0)].fg, colors::MUTED);
    }

    #[test]
    fn wrapped_rows_share_the_line_style() {
        let area = Rect::new(0, 0, 6, 4);
        let lyrics = displayed("aaa bbb\nccc", area);
        let scroll = ScrollState {
            active_line: Some(0),
            ..ScrollState::default()
        };

        let mut buf = Buffer::empty(area);
        LyricsWidget::new(&lyrics, scroll).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "aaa");
        assert_eq!(row(&buf, 1), "bbb");
        assert_eq!(row(&buf, 2), "ccc");
        let x = (0..area.width).find(|&x| buf[(x, 1)].symbol() == "b").unwrap();
        assert_eq!(buf[(x, 1)].fg, colors::ACCENT);
    }
}
