use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Widget},
};

use crate::util::colors;

pub struct Sidebar<'a> {
    items: Vec<&'a str>,
    selected_index: usize,
    enabled: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(items: Vec<&'a str>, selected_index: usize, enabled: bool) -> Self {
        Self {
            items,
            selected_index,
            enabled,
        }
    }
}

impl<'a> Widget for Sidebar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if self.enabled && i == self.selected_index {
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors::NEUTRAL)
                };
                let marker = if i == self.selected_index { "›" } else { " " };
                ListItem::new(format!(" {} {}. {}", marker, i + 1, item)).style(style)
            })
            .collect();

        List::new(items).render(area, buf);
    }
}
