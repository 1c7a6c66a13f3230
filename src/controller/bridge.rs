//! Selection to routing bridge: turns "this message is now selected" (or
//! "nothing is selected") into the route to show and the read-state side
//! effect to fire.

use crate::model::{Message, ThreadId};
use crate::route::Route;

/// Effects of one selection event. The caller dispatches them; repeat
/// suppression for mark-as-read lives in the store, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEffects {
    pub navigate_to: Route,
    pub mark_as_read: Option<ThreadId>,
}

/// Total over its input: an absent selection routes to the list root, a
/// present one to its detail view, and an unread message additionally
/// marks its thread read.
pub fn selection_effects(selection: Option<&Message>) -> SelectionEffects {
    match selection {
        None => SelectionEffects {
            navigate_to: Route::ThreadList,
            mark_as_read: None,
        },
        Some(message) => SelectionEffects {
            navigate_to: Route::Message {
                thread_id: message.thread_id.clone(),
                message_id: message.id.clone(),
            },
            mark_as_read: message.is_unread().then(|| message.thread_id.clone()),
        },
    }
}
