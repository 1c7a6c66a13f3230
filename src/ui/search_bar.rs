//! Search input line. Shows the pending edit while typing, otherwise the
//! committed query.

use ratatui::{Frame, layout::Rect, widgets::Paragraph};

use super::theme::Theme;

pub fn render_search_bar(frame: &mut Frame, area: Rect, text: &str, editing: bool) {
    let style = if editing {
        Theme::status_bar()
    } else if !text.is_empty() {
        Theme::text_secondary()
    } else {
        Theme::text_muted()
    };

    let cursor = if editing { "│" } else { "" };
    let line = format!(" / {}{} ", text, cursor);

    let paragraph = Paragraph::new(line).style(style);
    frame.render_widget(paragraph, area);
}
