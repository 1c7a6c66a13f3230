//! Label strip rendered under the status bar.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::model::Label;

use super::theme::Theme;

pub fn render_labels(frame: &mut Frame, area: Rect, labels: &[Label], active: Option<usize>) {
    let mut spans = vec![Span::styled(" ", Theme::label())];

    for (idx, label) in labels.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" │ ", Theme::status_muted()));
        }

        let style = if active == Some(idx) {
            Theme::label_active()
        } else {
            Theme::label()
        };
        spans.push(Span::styled(label.name.clone(), style));

        if label.unread_threads > 0 {
            spans.push(Span::styled(
                format!(" ({})", label.unread_threads),
                Theme::label_badge(),
            ));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::label());
    frame.render_widget(paragraph, area);
}
