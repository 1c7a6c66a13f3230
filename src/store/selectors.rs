//! Pure derivations over [`StoreSnapshot`]. Nothing in here mutates state
//! or talks to the store; callers decide what to do with the answers.

use crate::model::{Message, Thread};

use super::StoreSnapshot;

/// One row per thread, represented by the thread's newest message. This is
/// the list the keyboard walks.
pub fn row_messages(snapshot: &StoreSnapshot) -> Vec<&Message> {
    snapshot
        .threads
        .iter()
        .filter_map(|t| t.last_message())
        .collect()
}

pub fn thread_by_id<'a>(snapshot: &'a StoreSnapshot, thread_id: &str) -> Option<&'a Thread> {
    snapshot.threads.iter().find(|t| t.id == thread_id)
}

/// The message the current route points at, if it is still in the page.
pub fn selected_message(snapshot: &StoreSnapshot) -> Option<&Message> {
    let (thread_id, message_id) = snapshot.route.selected()?;
    thread_by_id(snapshot, thread_id)?
        .messages
        .iter()
        .find(|m| m.id == message_id)
}

/// Row after the current selection. With no selection (or a selection the
/// page no longer contains) this is the first row; past the end it is
/// absent.
pub fn next_message(snapshot: &StoreSnapshot) -> Option<&Message> {
    let rows = row_messages(snapshot);
    match selected_row_index(snapshot, &rows) {
        None => rows.first().copied(),
        Some(i) => rows.get(i + 1).copied(),
    }
}

/// Row before the current selection. Absent when nothing is selected or the
/// selection is already the first row.
pub fn previous_message(snapshot: &StoreSnapshot) -> Option<&Message> {
    let rows = row_messages(snapshot);
    let i = selected_row_index(snapshot, &rows)?;
    if i == 0 {
        return None;
    }
    rows.get(i - 1).copied()
}

fn selected_row_index(snapshot: &StoreSnapshot, rows: &[&Message]) -> Option<usize> {
    let (_, message_id) = snapshot.route.selected()?;
    rows.iter().position(|m| m.id == message_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MessageFlags;
    use crate::route::Route;
    use crate::store::StoreEvent;

    fn message(thread_id: &str, id: &str, date: i64) -> Message {
        Message {
            id: id.to_string(),
            thread_id: thread_id.to_string(),
            subject: "s".to_string(),
            from: "a@b.c".to_string(),
            snippet: String::new(),
            date,
            flags: MessageFlags::empty(),
        }
    }

    fn snapshot_with_rows() -> StoreSnapshot {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::ThreadsLoaded {
            query: String::new(),
            threads: vec![
                Thread {
                    id: "t1".to_string(),
                    messages: vec![message("t1", "m1", 1)],
                },
                Thread {
                    id: "t2".to_string(),
                    messages: vec![message("t2", "m2a", 1), message("t2", "m2b", 2)],
                },
                Thread {
                    id: "t3".to_string(),
                    messages: vec![message("t3", "m3", 1)],
                },
            ],
            has_more: false,
        });
        snapshot
    }

    fn select(snapshot: &mut StoreSnapshot, thread_id: &str, message_id: &str) {
        snapshot.apply(StoreEvent::RouteChanged(Route::Message {
            thread_id: thread_id.to_string(),
            message_id: message_id.to_string(),
        }));
    }

    #[test]
    fn test_rows_are_the_newest_message_of_each_thread() {
        let snapshot = snapshot_with_rows();
        let ids: Vec<&str> = row_messages(&snapshot).iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2b", "m3"]);
    }

    #[test]
    fn test_next_with_no_selection_is_the_first_row() {
        let snapshot = snapshot_with_rows();
        assert_eq!(next_message(&snapshot).map(|m| m.id.as_str()), Some("m1"));
    }

    #[test]
    fn test_next_advances_and_stops_at_the_end() {
        let mut snapshot = snapshot_with_rows();
        select(&mut snapshot, "t2", "m2b");
        assert_eq!(next_message(&snapshot).map(|m| m.id.as_str()), Some("m3"));

        select(&mut snapshot, "t3", "m3");
        assert!(next_message(&snapshot).is_none());
    }

    #[test]
    fn test_previous_requires_a_selection_past_the_first_row() {
        let mut snapshot = snapshot_with_rows();
        assert!(previous_message(&snapshot).is_none());

        select(&mut snapshot, "t1", "m1");
        assert!(previous_message(&snapshot).is_none());

        select(&mut snapshot, "t3", "m3");
        assert_eq!(
            previous_message(&snapshot).map(|m| m.id.as_str()),
            Some("m2b")
        );
    }

    #[test]
    fn test_vanished_selection_falls_back_to_the_first_row() {
        let mut snapshot = snapshot_with_rows();
        select(&mut snapshot, "t9", "m9");
        assert!(selected_message(&snapshot).is_none());
        assert_eq!(next_message(&snapshot).map(|m| m.id.as_str()), Some("m1"));
        assert!(previous_message(&snapshot).is_none());
    }

    #[test]
    fn test_selected_message_follows_the_route() {
        let mut snapshot = snapshot_with_rows();
        select(&mut snapshot, "t2", "m2a");
        assert_eq!(
            selected_message(&snapshot).map(|m| m.id.as_str()),
            Some("m2a")
        );
    }
}
