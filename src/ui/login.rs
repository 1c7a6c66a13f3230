//! Overlay shown once the mail service has rejected the stored token.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme::Theme;
use super::widgets::centered_rect;

pub fn render_login(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 48, 9);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border_focused())
        .style(Theme::main_bg());
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines = vec![
        Line::from(Span::styled("✉ gust", Theme::title())),
        Line::from(""),
        Line::from(Span::styled(
            "Not signed in to the mail service.",
            Theme::text(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Run `gust auth` or set GUST_TOKEN,",
            Theme::text_secondary(),
        )),
        Line::from(Span::styled("then restart.", Theme::text_secondary())),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
