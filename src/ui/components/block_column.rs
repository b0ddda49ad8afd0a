use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as Frame, Paragraph, Widget};

use crate::problem::Block;
use crate::session::board::Zone;
use crate::ui::theme::Theme;

const TAB_WIDTH: usize = 4;

/// One column of code blocks with a cursor and an append slot at the end.
pub struct BlockColumn<'a> {
    zone: Zone,
    blocks: &'a [Block],
    cursor: usize,
    focused: bool,
    /// Index of the block being carried, when it comes from this column.
    dragged: Option<usize>,
    /// A block is being carried from either column.
    carrying: bool,
    theme: &'a Theme,
}

impl<'a> BlockColumn<'a> {
    pub fn new(zone: Zone, blocks: &'a [Block], theme: &'a Theme) -> Self {
        Self {
            zone,
            blocks,
            cursor: 0,
            focused: false,
            dragged: None,
            carrying: false,
            theme,
        }
    }

    pub fn cursor(mut self, cursor: usize, focused: bool) -> Self {
        self.cursor = cursor;
        self.focused = focused;
        self
    }

    pub fn drag(mut self, dragged: Option<usize>, carrying: bool) -> Self {
        self.dragged = dragged;
        self.carrying = carrying;
        self
    }
}

/// Expand tabs to the next tab stop so indentation survives rendering.
pub fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let width = TAB_WIDTH - (col % TAB_WIDTH);
            out.extend(std::iter::repeat_n(' ', width));
            col += width;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}

impl Widget for BlockColumn<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let frame = Frame::bordered()
            .title(format!(" {} ({}) ", self.zone.title(), self.blocks.len()))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = frame.inner(area);
        frame.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        let mut cursor_line = 0usize;

        for (i, block) in self.blocks.iter().enumerate() {
            let at_cursor = self.focused && i == self.cursor;
            let is_dragged = self.dragged == Some(i);
            if at_cursor {
                cursor_line = lines.len();
            }

            let style = if is_dragged {
                Style::default()
                    .fg(colors.dragging())
                    .bg(colors.code_bg())
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC)
            } else if at_cursor {
                Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg())
            } else {
                Style::default().fg(colors.code_fg()).bg(colors.code_bg())
            };
            let marker = match (is_dragged, at_cursor) {
                (true, _) => "\u{21c5} ",
                (false, true) => "> ",
                (false, false) => "  ",
            };

            let text = if block.text.is_empty() { " " } else { block.text.as_str() };
            for (n, raw) in text.lines().enumerate() {
                let lead = if n == 0 { marker } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(lead, Style::default().fg(colors.accent())),
                    Span::styled(expand_tabs(raw), style),
                ]));
            }
        }

        let at_end = self.focused && self.cursor >= self.blocks.len();
        if at_end {
            cursor_line = lines.len();
        }
        let slot_text = if self.carrying && self.dragged.is_none() {
            "+ drop here to append"
        } else if self.blocks.is_empty() {
            "(empty)"
        } else {
            ""
        };
        let slot_style = if at_end {
            Style::default().fg(colors.cursor_fg()).bg(colors.cursor_bg())
        } else {
            Style::default().fg(colors.muted())
        };
        lines.push(Line::from(vec![
            Span::styled(if at_end { "> " } else { "  " }, Style::default().fg(colors.accent())),
            Span::styled(slot_text, slot_style),
        ]));

        let height = inner.height as usize;
        let scroll = cursor_line.saturating_sub(height.saturating_sub(1));
        Paragraph::new(lines)
            .scroll((scroll.min(u16::MAX as usize) as u16, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs_to_stops() {
        assert_eq!(expand_tabs("\tx"), "    x");
        assert_eq!(expand_tabs("ab\tc"), "ab  c");
        assert_eq!(expand_tabs("    keep"), "    keep");
    }

    #[test]
    fn test_render_shows_block_text_and_title() {
        let theme = Theme::default();
        let blocks = vec![Block::correct("for i in x:"), Block::correct("\tprint(i)")];
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        BlockColumn::new(Zone::Solution, &blocks, &theme)
            .cursor(1, true)
            .render(area, &mut buf);

        let rows: Vec<String> = (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect())
            .collect();
        assert!(rows[0].contains("Your solution (2)"));
        assert!(rows[1].contains("for i in x:"));
        assert!(rows[2].contains(">     print(i)"));
    }
}
