//! Status bar rendering with the authorization indicator and load spinner.

use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme::{Theme, symbols};
use super::widgets::display_width;
use crate::constants::SPINNER_FRAME_MS;
use crate::model::AuthState;

/// Status bar info for rendering
pub struct StatusInfo<'a> {
    pub auth: AuthState,
    pub loading: bool,
    /// The committed query; empty means the inbox.
    pub query: &'a str,
    pub loaded: usize,
    pub unread: usize,
    pub account: &'a str,
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, info: &StatusInfo) {
    let style = Theme::status_bar();
    let width = area.width as usize;

    let (indicator, indicator_style) = if info.loading || info.auth.is_authorizing() {
        (format!(" {} ", spinner_char()), Theme::status_syncing())
    } else if info.auth.is_authorized() {
        (
            format!(" {} ", symbols::AUTHORIZED),
            Theme::status_authorized(),
        )
    } else {
        (
            format!(" {} ", symbols::UNAUTHORIZED),
            Theme::status_unauthorized(),
        )
    };

    let context = if info.query.is_empty() {
        "Inbox ".to_string()
    } else {
        format!("\"{}\" ", info.query)
    };
    let unread = info.unread.to_string();
    let total = format!(" / {}", info.loaded);

    let account = format!("{} ", info.account);

    let left_width =
        display_width(&indicator) + display_width(&context) + unread.len() + total.len();
    let padding = " ".repeat(width.saturating_sub(left_width + display_width(&account)));

    let line = Line::from(vec![
        Span::styled(indicator, indicator_style),
        Span::styled(context, style),
        Span::styled(unread, style.add_modifier(Modifier::BOLD)),
        Span::styled(total, style),
        Span::styled(padding, style),
        Span::styled(account, Theme::status_muted()),
    ]);

    let paragraph = Paragraph::new(line).style(style);
    frame.render_widget(paragraph, area);
}

/// Get an animated spinner character for loading states
pub fn spinner_char() -> char {
    let spinner = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
    let idx = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        / SPINNER_FRAME_MS) as usize
        % spinner.chars().count();

    spinner.chars().nth(idx).unwrap_or('*')
}
