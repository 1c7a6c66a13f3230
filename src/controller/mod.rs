//! The view-state reconciliation core.
//!
//! The [`Controller`] owns the transient per-view state (pending search
//! text, requested page size) and funnels every lifecycle trigger, mount,
//! newly committed query, local mutation, through the one pure
//! [`reconcile`] function. Each trigger hands back the [`LoadRequest`] to
//! dispatch; the store drops repeats, so callers never have to guess
//! whether a dispatch is redundant.

mod bridge;
mod gate;
mod reconcile;

pub use bridge::{SelectionEffects, selection_effects};
pub use gate::RenderGate;
pub use reconcile::{LoadRequest, ViewState, reconcile};

use crate::config::Config;
use crate::constants::{PAGE_SIZE_STEP, THREAD_PAGE_SIZE};
use crate::model::{AuthState, Label, MessageBody, MessageId, Thread, ThreadId};
use crate::route::Route;
use crate::store::StoreSnapshot;

pub struct Controller {
    state: ViewState,
    /// The committed query this controller last reconciled against, used
    /// to notice externally committed queries.
    observed_query: String,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: ViewState::new(),
            observed_query: String::new(),
        }
    }

    /// First reconciliation, issued once when the view comes up.
    pub fn on_mount(&mut self, committed_query: &str) -> LoadRequest {
        self.observed_query = committed_query.to_string();
        reconcile(committed_query, &self.state)
    }

    /// Notice a committed query that changed under us. A new one resets
    /// the edit text and page size before reconciling, the same as a local
    /// submit would.
    pub fn observe_committed(&mut self, committed_query: &str) -> Option<LoadRequest> {
        if committed_query == self.observed_query {
            return None;
        }
        self.observed_query = committed_query.to_string();
        self.state.pending_query = None;
        self.state.requested_page_size = THREAD_PAGE_SIZE;
        Some(reconcile(committed_query, &self.state))
    }

    /// Grow the requested page by one increment. Growth is monotonic;
    /// exhaustion is signaled by the store's `has_more`, not here.
    pub fn request_more(&mut self, committed_query: &str) -> LoadRequest {
        self.state.requested_page_size += PAGE_SIZE_STEP;
        reconcile(committed_query, &self.state)
    }

    /// Replace the pending search text. A fresh search starts from the
    /// first page, so the page size snaps back to the base increment. The
    /// returned request still carries the committed query; the edit is
    /// display only until submitted.
    pub fn edit_query(&mut self, text: String, committed_query: &str) -> LoadRequest {
        self.state.pending_query = Some(text);
        self.state.requested_page_size = THREAD_PAGE_SIZE;
        reconcile(committed_query, &self.state)
    }

    pub fn push_char(&mut self, c: char, committed_query: &str) -> LoadRequest {
        let mut text = self.display_query(committed_query).to_string();
        text.push(c);
        self.edit_query(text, committed_query)
    }

    pub fn pop_char(&mut self, committed_query: &str) -> LoadRequest {
        let mut text = self.display_query(committed_query).to_string();
        text.pop();
        self.edit_query(text, committed_query)
    }

    /// Drop the pending edit; the display falls back to the committed
    /// query.
    pub fn cancel_edit(&mut self) {
        self.state.pending_query = None;
    }

    /// Local state after a submit: edit cleared, page size back to base.
    /// The caller commits the query to the store first and passes the new
    /// committed value in.
    pub fn on_submit(&mut self, committed_query: &str) -> LoadRequest {
        self.observed_query = committed_query.to_string();
        self.state.pending_query = None;
        self.state.requested_page_size = THREAD_PAGE_SIZE;
        reconcile(committed_query, &self.state)
    }

    /// The text the search input shows: pending edit when present, else
    /// the committed query.
    pub fn display_query<'a>(&'a self, committed_query: &'a str) -> &'a str {
        self.state.pending_query.as_deref().unwrap_or(committed_query)
    }

    pub fn page_size(&self) -> u32 {
        self.state.requested_page_size
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the renderer draws, computed fresh per frame and compared
/// by the render gate. Spinner animation is render-thread local and
/// deliberately not part of this.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProps {
    pub auth: AuthState,
    pub loading: bool,
    pub error: Option<String>,
    pub searching: bool,
    pub display_query: String,
    pub committed_query: String,
    pub threads: Vec<Thread>,
    pub selected: Option<(ThreadId, MessageId)>,
    pub has_more: bool,
    pub labels: Vec<Label>,
    pub active_label: Option<usize>,
    pub route: Route,
    pub body: Option<MessageBody>,
    pub account: String,
    pub date_format: String,
}

pub fn build_view_props(
    snapshot: &StoreSnapshot,
    controller: &Controller,
    config: &Config,
    searching: bool,
    active_label: Option<usize>,
) -> ViewProps {
    let selected = snapshot
        .route
        .selected()
        .map(|(t, m)| (t.to_string(), m.to_string()));
    let body = snapshot
        .route
        .selected()
        .and_then(|(_, message_id)| snapshot.bodies.get(message_id))
        .cloned();

    ViewProps {
        auth: snapshot.auth,
        loading: snapshot.status.loading,
        error: snapshot.status.error.clone(),
        searching,
        display_query: controller
            .display_query(&snapshot.committed_query)
            .to_string(),
        committed_query: snapshot.committed_query.clone(),
        threads: snapshot.threads.clone(),
        selected,
        has_more: snapshot.has_more,
        labels: snapshot.labels.clone(),
        active_label,
        route: snapshot.route.clone(),
        body,
        account: config.account.email.clone(),
        date_format: config.ui.date_format.clone(),
    }
}
