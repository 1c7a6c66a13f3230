//! Terminal rendering. Every pane is a pure function from [`ViewProps`]
//! to widgets; nothing in here touches the store.

mod labels;
mod login;
mod message_view;
mod search_bar;
mod status_bar;
pub mod theme;
mod thread_list;
mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    widgets::Block,
};

use crate::controller::ViewProps;
use crate::route::Route;

use status_bar::{StatusInfo, render_status_bar};
use theme::Theme;
use widgets::{error_bar, help_bar};

pub fn render(frame: &mut Frame, props: &ViewProps) {
    frame.render_widget(Block::default().style(Theme::main_bg()), frame.area());

    let show_search = props.searching || !props.display_query.is_empty();
    let show_labels = !props.labels.is_empty() && !props.route.is_message();

    let mut constraints = vec![Constraint::Length(1)];
    if show_search {
        constraints.push(Constraint::Length(1));
    }
    if show_labels {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut next = 0;
    let status_area = chunks[next];
    next += 1;
    let search_area = if show_search {
        next += 1;
        Some(chunks[next - 1])
    } else {
        None
    };
    let labels_area = if show_labels {
        next += 1;
        Some(chunks[next - 1])
    } else {
        None
    };
    let main_area = chunks[next];
    let bottom_area = chunks[next + 1];

    let unread = props.threads.iter().filter(|t| t.has_unread()).count();
    render_status_bar(
        frame,
        status_area,
        &StatusInfo {
            auth: props.auth,
            loading: props.loading,
            query: &props.committed_query,
            loaded: props.threads.len(),
            unread,
            account: &props.account,
        },
    );

    if let Some(area) = search_area {
        search_bar::render_search_bar(frame, area, &props.display_query, props.searching);
    }
    if let Some(area) = labels_area {
        labels::render_labels(frame, area, &props.labels, props.active_label);
    }

    match props.route {
        Route::ThreadList => thread_list::render_thread_list(frame, main_area, props),
        Route::Message { .. } => message_view::render_message_view(frame, main_area, props),
    }

    if let Some(error) = &props.error {
        error_bar(frame, bottom_area, error);
    } else {
        help_bar(frame, bottom_area, help_entries(props));
    }

    if !props.auth.is_authorized() && !props.auth.is_authorizing() {
        login::render_login(frame, frame.area());
    }
}

fn help_entries(props: &ViewProps) -> &'static [(&'static str, &'static str)] {
    if props.searching {
        &[("Enter", "search"), ("Esc", "cancel")]
    } else if props.route.is_message() {
        &[("j/k", "next/prev"), ("Esc", "back"), ("q", "quit")]
    } else {
        &[
            ("j/k", "select"),
            ("/", "search"),
            ("Tab", "label"),
            ("r", "refresh"),
            ("q", "quit"),
        ]
    }
}
