use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::session::certificate::{ACHIEVEMENT, CERTIFIES, Certificate, TITLE};
use crate::ui::theme::Theme;

pub struct CertificateView<'a> {
    certificate: &'a Certificate,
    theme: &'a Theme,
}

impl<'a> CertificateView<'a> {
    pub fn new(certificate: &'a Certificate, theme: &'a Theme) -> Self {
        Self { certificate, theme }
    }
}

impl Widget for CertificateView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let gold = Style::default().fg(colors.certificate());

        let block = Block::bordered()
            .border_type(BorderType::Double)
            .border_style(gold)
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(""),
            Line::from("\u{1f3c6}"),
            Line::from(Span::styled(TITLE, gold.add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(Span::styled(CERTIFIES, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled(
                self.certificate.name.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from(""),
            Line::from(Span::styled(ACHIEVEMENT, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Date: ", Style::default().fg(colors.muted())),
                Span::styled(self.certificate.long_date(), Style::default().fg(colors.fg())),
            ]),
            Line::from(vec![
                Span::styled("Signature: ", Style::default().fg(colors.muted())),
                Span::styled(
                    self.certificate.instructor.as_str(),
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(Modifier::ITALIC),
                ),
            ]),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
