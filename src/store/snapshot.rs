//! The view-facing state snapshot and the reducer that folds store events
//! into it. Every state change, whether it came from the actor or from a
//! synchronous dispatch on the app thread, goes through [`StoreSnapshot::apply`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::constants::ERROR_TTL_SECS;
use crate::model::{AuthState, Label, MessageBody, MessageId, Thread};
use crate::route::Route;

use super::StoreEvent;

/// Loading flag plus the transient error banner.
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub loading: bool,
    pub error: Option<String>,
    error_time: Option<Instant>,
}

impl StatusState {
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
        self.error_time = Some(Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_time = None;
    }

    /// Drop the error banner once it has been on screen long enough.
    pub fn clear_error_if_expired(&mut self) {
        if let Some(t) = self.error_time {
            if t.elapsed() > Duration::from_secs(ERROR_TTL_SECS) {
                self.clear_error();
            }
        }
    }
}

/// Everything the view layer reads. Owned by the app thread and advanced
/// one event at a time.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub auth: AuthState,
    /// The query the last submitted search committed. The input field's
    /// pending text lives in the controller, not here.
    pub committed_query: String,
    pub threads: Vec<Thread>,
    pub has_more: bool,
    pub labels: Vec<Label>,
    pub route: Route,
    pub bodies: HashMap<MessageId, MessageBody>,
    pub status: StatusState,
}

impl StoreSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::AuthStateChanged(auth) => {
                self.auth = auth;
                if auth.is_authorized() {
                    self.status.clear_error();
                }
            }
            StoreEvent::LoadStarted { .. } => {
                self.status.loading = true;
            }
            StoreEvent::ThreadsLoaded {
                query: _,
                threads,
                has_more,
            } => {
                // The committed query only moves on QueryCommitted; a page
                // arriving late must not rewrite it.
                self.threads = threads;
                self.has_more = has_more;
                self.status.loading = false;
                // A page arriving supersedes any earlier failure banner.
                self.status.clear_error();
            }
            StoreEvent::QueryCommitted(query) => {
                self.committed_query = query;
            }
            StoreEvent::ThreadMarkedRead(thread_id) => {
                if let Some(thread) = self.threads.iter_mut().find(|t| t.id == thread_id) {
                    for message in &mut thread.messages {
                        message.flags.remove(crate::model::MessageFlags::UNREAD);
                    }
                }
            }
            StoreEvent::RouteChanged(route) => {
                self.route = route;
            }
            StoreEvent::LabelsLoaded(labels) => {
                self.labels = labels;
            }
            StoreEvent::BodyLoaded { message_id, body } => {
                self.bodies.insert(message_id, body);
            }
            StoreEvent::LoadFailed(message) => {
                self.status.loading = false;
                self.status.set_error(message);
            }
            StoreEvent::Error(message) => {
                self.status.set_error(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Message, MessageFlags};

    fn thread_with_unread(id: &str) -> Thread {
        Thread {
            id: id.to_string(),
            messages: vec![Message {
                id: format!("{}-m1", id),
                thread_id: id.to_string(),
                subject: "s".to_string(),
                from: "a@b.c".to_string(),
                snippet: String::new(),
                date: 1,
                flags: MessageFlags::UNREAD,
            }],
        }
    }

    #[test]
    fn test_threads_loaded_replaces_page_and_clears_loading() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::LoadStarted {
            query: String::new(),
            page_size: 20,
        });
        assert!(snapshot.status.loading);

        snapshot.apply(StoreEvent::ThreadsLoaded {
            query: String::new(),
            threads: vec![thread_with_unread("t1"), thread_with_unread("t2")],
            has_more: true,
        });
        assert_eq!(snapshot.threads.len(), 2);
        assert!(snapshot.has_more);
        assert!(!snapshot.status.loading);
    }

    #[test]
    fn test_committed_query_only_moves_on_commit() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::ThreadsLoaded {
            query: "invoice".to_string(),
            threads: vec![],
            has_more: false,
        });
        assert_eq!(snapshot.committed_query, "");

        snapshot.apply(StoreEvent::QueryCommitted("invoice".to_string()));
        assert_eq!(snapshot.committed_query, "invoice");
    }

    #[test]
    fn test_thread_marked_read_clears_unread_flags() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::ThreadsLoaded {
            query: String::new(),
            threads: vec![thread_with_unread("t1"), thread_with_unread("t2")],
            has_more: false,
        });

        snapshot.apply(StoreEvent::ThreadMarkedRead("t1".to_string()));
        assert!(!snapshot.threads[0].has_unread());
        assert!(snapshot.threads[1].has_unread());
    }

    #[test]
    fn test_load_failed_sets_error_and_stops_loading() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::LoadStarted {
            query: String::new(),
            page_size: 20,
        });
        snapshot.apply(StoreEvent::LoadFailed("no network".to_string()));
        assert!(!snapshot.status.loading);
        assert_eq!(snapshot.status.error.as_deref(), Some("no network"));
    }

    #[test]
    fn test_successful_load_clears_the_error_banner() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::LoadFailed("no network".to_string()));
        assert!(snapshot.status.error.is_some());

        snapshot.apply(StoreEvent::ThreadsLoaded {
            query: String::new(),
            threads: vec![thread_with_unread("t1")],
            has_more: false,
        });
        assert!(snapshot.status.error.is_none());
    }

    #[test]
    fn test_error_expires_after_ttl() {
        let mut status = StatusState::default();
        status.set_error("oops".to_string());
        status.clear_error_if_expired();
        assert!(status.error.is_some());

        status.error_time = Some(Instant::now() - Duration::from_secs(ERROR_TTL_SECS + 1));
        status.clear_error_if_expired();
        assert!(status.error.is_none());
    }

    #[test]
    fn test_body_loaded_is_cached_by_message_id() {
        let mut snapshot = StoreSnapshot::new();
        snapshot.apply(StoreEvent::BodyLoaded {
            message_id: "m1".to_string(),
            body: MessageBody {
                text: Some("hello".to_string()),
                html: None,
            },
        });
        assert!(snapshot.bodies.contains_key("m1"));

        snapshot.apply(StoreEvent::RouteChanged(Route::Message {
            thread_id: "t1".to_string(),
            message_id: "m1".to_string(),
        }));
        assert!(snapshot.route.is_message());
    }
}
