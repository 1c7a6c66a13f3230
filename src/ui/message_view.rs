//! Full-screen view of the selected message.

use chrono::{Local, TimeZone};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::controller::ViewProps;
use crate::model::Message;

use super::status_bar::spinner_char;
use super::theme::Theme;
use super::widgets::sanitize_text;

pub fn render_message_view(frame: &mut Frame, area: Rect, props: &ViewProps) {
    let Some(message) = selected_message(props) else {
        render_missing(frame, area);
        return;
    };

    let mut lines = vec![
        header_line("From: ", message.display_from().to_string(), Theme::text_accent()),
        header_line(
            "Date: ",
            format_header_date(message.date, &props.date_format),
            Theme::text(),
        ),
        header_line("Subject: ", message.subject.clone(), Theme::text()),
        Line::from(Span::styled(
            "─".repeat(area.width as usize),
            Theme::border(),
        )),
    ];

    match &props.body {
        Some(body) => {
            for raw in body.display_text().lines() {
                lines.push(Line::from(Span::styled(
                    sanitize_text(raw),
                    Theme::text(),
                )));
            }
        }
        None => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} Loading message...", spinner_char()),
                Theme::text_muted(),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .style(Theme::main_bg())
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_missing(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("Message is no longer loaded."),
        Line::from("Press Esc to return to the list."),
    ];
    let paragraph = Paragraph::new(lines)
        .style(Theme::text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn selected_message(props: &ViewProps) -> Option<&Message> {
    let (thread_id, message_id) = props.selected.as_ref()?;
    props
        .threads
        .iter()
        .find(|t| &t.id == thread_id)?
        .messages
        .iter()
        .find(|m| &m.id == message_id)
}

fn header_line(label: &'static str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Theme::text_muted()),
        Span::styled(value, style),
    ])
}

fn format_header_date(timestamp: i64, format: &str) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(date) => date.format(format).to_string(),
        None => String::new(),
    }
}
