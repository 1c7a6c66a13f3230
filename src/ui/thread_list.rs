//! Thread list pane: one row per thread plus a footer while more pages
//! are available.

use std::sync::{Mutex, OnceLock};

use aho_corasick::AhoCorasick;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use crate::constants::{ENCOURAGEMENT_THRESHOLD, SCROLL_TARGET_FRACTION, THREAD_PAGE_SIZE};
use crate::controller::ViewProps;
use crate::model::Thread;

use super::theme::{Theme, symbols, with_selection_bg};
use super::widgets::{display_width, format_relative_date, truncate_string};

const FROM_WIDTH: usize = 20;

/// Shown at the bottom of deep result lists, picked by page count so a
/// redraw with unchanged state stays identical.
const PAGING_MESSAGES: [&str; 14] = [
    "Still going?",
    "Now you're just getting greedy.",
    "♫ I still haven't found what I'm lookin' for. ♫",
    "I could go on forever.",
    "Perhaps you should narrow the search term?",
    "Look at you go!",
    "♫ This is the song that never ends ♫",
    "♫ Scrollin, scrollin, scrollin through the emails ♫",
    "Really?",
    "Give up, you'll never find it now.",
    "I know it must be here somewhere.",
    "You can do it!",
    "Eventually you'll just give up.",
    "Dig dig dig!",
];

pub fn render_thread_list(frame: &mut Frame, area: Rect, props: &ViewProps) {
    if props.threads.is_empty() {
        render_empty(frame, area, props);
        return;
    }

    let visible = area.height as usize;
    let selected = selected_row(props);

    let scroll = match selected {
        Some(idx) => idx
            .saturating_sub(visible / SCROLL_TARGET_FRACTION)
            .min(props.threads.len().saturating_sub(visible.max(1))),
        None => 0,
    };
    let end = (scroll + visible).min(props.threads.len());

    let mut items: Vec<ListItem> = Vec::with_capacity(visible);
    for idx in scroll..end {
        items.push(ListItem::new(render_row(
            &props.threads[idx],
            selected == Some(idx),
            area.width,
            &props.committed_query,
        )));
    }

    // The footer only fits once the last loaded row is on screen.
    if end == props.threads.len() && end - scroll < visible {
        if let Some(line) = footer_line(props) {
            items.push(ListItem::new(line));
        }
    }

    frame.render_widget(List::new(items).style(Theme::main_bg()), area);
}

fn render_empty(frame: &mut Frame, area: Rect, props: &ViewProps) {
    let text = if props.loading {
        "Loading threads...".to_string()
    } else if props.committed_query.is_empty() {
        "No threads.".to_string()
    } else {
        format!("No results for \"{}\".", props.committed_query)
    };

    let lines = vec![Line::from(""), Line::from(text)];
    let paragraph = Paragraph::new(lines)
        .style(Theme::text_muted())
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_row(thread: &Thread, selected: bool, width: u16, query: &str) -> Line<'static> {
    let Some(message) = thread.last_message() else {
        return Line::from("");
    };
    let width = width as usize;
    let unread = message.is_unread();

    let base = with_selection_bg(
        if unread {
            Theme::text_unread()
        } else {
            Theme::text_secondary()
        },
        selected,
    );
    let muted = with_selection_bg(Theme::text_muted(), selected);
    let highlight = with_selection_bg(Theme::match_highlight(), selected);

    let indicator = if selected {
        Theme::unread_indicator_selected()
    } else {
        Theme::unread_indicator()
    };
    let star = if selected {
        Theme::star_indicator_selected()
    } else {
        Theme::star_indicator()
    };

    let from = truncate_string(message.display_from(), FROM_WIDTH);
    let mut spans = vec![
        Span::styled(if unread { symbols::UNREAD } else { symbols::READ }, indicator),
        Span::styled(if message.is_starred() { symbols::STARRED } else { " " }, star),
        Span::styled(
            format!(" {:<width$} ", from, width = FROM_WIDTH),
            if unread { base } else { muted },
        ),
    ];
    if thread.len() > 1 {
        spans.push(Span::styled(
            format!("[{}] ", thread.len()),
            with_selection_bg(Theme::thread_badge(), selected),
        ));
    }

    let date = format_relative_date(message.date);
    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let text_width = width.saturating_sub(used + display_width(&date) + 2);

    let subject = truncate_string(message.subject.trim(), text_width);
    spans.extend(highlight_matches(&subject, query, base, highlight));

    let snippet_width = text_width.saturating_sub(display_width(&subject) + 2);
    if snippet_width > 4 {
        spans.push(Span::styled("  ".to_string(), base));
        let snippet = truncate_string(message.snippet.trim(), snippet_width);
        spans.extend(highlight_matches(&snippet, query, muted, highlight));
    }

    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let pad = width.saturating_sub(used + display_width(&date) + 1);
    spans.push(Span::styled(" ".repeat(pad), base));
    spans.push(Span::styled(date, muted));
    Line::from(spans)
}

fn selected_row(props: &ViewProps) -> Option<usize> {
    let (_, message_id) = props.selected.as_ref()?;
    props
        .threads
        .iter()
        .position(|t| t.last_message().is_some_and(|m| &m.id == message_id))
}

fn footer_line(props: &ViewProps) -> Option<Line<'static>> {
    let text = footer_text(props.threads.len(), props.has_more)?;
    Some(
        Line::from(Span::styled(text, Theme::text_muted())).alignment(Alignment::Center),
    )
}

fn footer_text(count: usize, has_more: bool) -> Option<String> {
    if !has_more {
        return None;
    }
    let mut text = format!("You've seen {}.", count);
    if count >= ENCOURAGEMENT_THRESHOLD {
        text.push(' ');
        text.push_str(encouragement(count));
    }
    text.push_str(" Loading more...");
    Some(text)
}

fn encouragement(count: usize) -> &'static str {
    let page = count / THREAD_PAGE_SIZE as usize;
    PAGING_MESSAGES[page % PAGING_MESSAGES.len()]
}

/// Splits `text` into styled spans with every occurrence of a query word
/// rendered in the highlight style. The compiled matcher is cached per
/// query since rows are redrawn far more often than the query changes.
fn highlight_matches(
    text: &str,
    query: &str,
    base: Style,
    highlight: Style,
) -> Vec<Span<'static>> {
    let plain = |text: &str| vec![Span::styled(text.to_string(), base)];
    if query.trim().is_empty() || text.is_empty() {
        return plain(text);
    }

    static MATCHER: OnceLock<Mutex<Option<(String, AhoCorasick)>>> = OnceLock::new();
    let cache = MATCHER.get_or_init(|| Mutex::new(None));
    let mut cache = match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    let stale = cache.as_ref().is_none_or(|(cached, _)| cached != query);
    if stale {
        let words: Vec<&str> = query.split_whitespace().collect();
        match AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&words)
        {
            Ok(ac) => *cache = Some((query.to_string(), ac)),
            Err(_) => return plain(text),
        }
    }
    let Some((_, ac)) = cache.as_ref() else {
        return plain(text);
    };

    let mut spans = Vec::new();
    let mut last = 0;
    for m in ac.find_iter(text) {
        if m.start() > last {
            spans.push(Span::styled(text[last..m.start()].to_string(), base));
        }
        spans.push(Span::styled(text[m.start()..m.end()].to_string(), highlight));
        last = m.end();
    }
    if last < text.len() {
        spans.push(Span::styled(text[last..].to_string(), base));
    }
    if spans.is_empty() {
        return plain(text);
    }
    spans
}
