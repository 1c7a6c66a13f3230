//! The store: single owner of server state and the reducer over it
//!
//! Split into: mod.rs (commands, events, handle), actor.rs (the async actor
//! doing the network work), snapshot.rs (the reduced state the app thread
//! owns), selectors.rs (pure reads over the snapshot).
//!
//! Only network work goes through the actor. Local transitions (committing
//! a query, changing the route, the optimistic unread clear) are applied to
//! the snapshot directly on the app thread, through the same reducer the
//! actor's events go through.

mod actor;
pub mod selectors;
mod snapshot;

pub use actor::spawn_store_actor;
pub use snapshot::{StatusState, StoreSnapshot};

use tokio::sync::mpsc;

use crate::model::{AuthState, Label, MessageBody, MessageId, Thread, ThreadId};
use crate::route::Route;

/// Commands the app sends to the store actor.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Request one page of threads. The actor drops the command when the
    /// same (query, page_size) already completed or is in flight.
    LoadThreads { query: String, page_size: u32 },
    /// Like LoadThreads, but forgets completed params first so the same
    /// page is fetched again.
    Refresh { query: String, page_size: u32 },
    MarkAsRead(ThreadId),
    LoadLabels,
    FetchBody(MessageId),
    Shutdown,
}

/// State changes, produced by the actor or applied locally.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    AuthStateChanged(AuthState),
    LoadStarted {
        query: String,
        page_size: u32,
    },
    ThreadsLoaded {
        query: String,
        threads: Vec<Thread>,
        has_more: bool,
    },
    QueryCommitted(String),
    ThreadMarkedRead(ThreadId),
    RouteChanged(Route),
    LabelsLoaded(Vec<Label>),
    BodyLoaded {
        message_id: MessageId,
        body: MessageBody,
    },
    /// A thread page load failed. Clears the loading flag.
    LoadFailed(String),
    /// Any other operation failed.
    Error(String),
}

/// Handle to the store actor: commands in, events out.
pub struct StoreHandle {
    pub cmd_tx: mpsc::Sender<StoreCommand>,
    pub event_rx: mpsc::Receiver<StoreEvent>,
}
