use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct NamePrompt<'a> {
    input: &'a LineInput,
    placeholder: &'a str,
    theme: &'a Theme,
}

impl<'a> NamePrompt<'a> {
    pub fn new(input: &'a LineInput, placeholder: &'a str, theme: &'a Theme) -> Self {
        Self {
            input,
            placeholder,
            theme,
        }
    }
}

impl Widget for NamePrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);

        let block = Block::bordered()
            .title(" Welcome ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let (before, at, after) = self.input.render_parts();
        let cursor_style = Style::default()
            .fg(colors.cursor_fg())
            .bg(colors.cursor_bg());
        let mut field = vec![
            Span::styled("  > ", Style::default().fg(colors.accent())),
            Span::styled(before, Style::default().fg(colors.fg())),
        ];
        match at {
            Some(ch) => field.push(Span::styled(ch.to_string(), cursor_style)),
            None => field.push(Span::styled(" ", cursor_style)),
        }
        field.push(Span::styled(after, Style::default().fg(colors.fg())));

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "What is your name?",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(Span::styled(
                "It will appear on your certificate.",
                Style::default().fg(colors.muted()),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
            Line::from(field),
            Line::from(""),
            Line::from(Span::styled(
                format!("  [Enter] Start  (blank uses \"{}\")", self.placeholder),
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
