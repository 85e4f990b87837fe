use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::{lyrics::Source, ui::layout::panel, util::colors};

/// Citations returned with the lyrics.
pub struct SourcesWidget<'a> {
    sources: &'a [Source],
}

impl<'a> SourcesWidget<'a> {
    pub fn new(sources: &'a [Source]) -> Self {
        Self { sources }
    }
}

impl<'a> Widget for SourcesWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = self
            .sources
            .iter()
            .map(|source| {
                let mut spans = vec![Span::raw(format!("• {}", source.label()))];
                if source.label() != source.uri {
                    spans.push(Span::styled(
                        format!("  {}", source.uri),
                        Style::default().fg(colors::MUTED),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(panel().title(" Sources "))
            .render(area, buf);
    }
}
