//! Navigation targets as values.
//!
//! Every selection state maps to exactly one route: no selection is the
//! thread list at `/`, a selected message is `/thread/{tid}/message/{mid}/`.

use crate::model::{MessageId, ThreadId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    ThreadList,
    Message {
        thread_id: ThreadId,
        message_id: MessageId,
    },
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Self::ThreadList => "/".to_string(),
            Self::Message {
                thread_id,
                message_id,
            } => format!("/thread/{}/message/{}/", thread_id, message_id),
        }
    }

    /// Parse a path back into a route. Unknown paths are rejected rather
    /// than defaulting, so a bad path cannot silently clear the selection.
    #[allow(dead_code)]
    pub fn parse(path: &str) -> Option<Self> {
        if path == "/" {
            return Some(Self::ThreadList);
        }
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            ["thread", tid, "message", mid] if !tid.is_empty() && !mid.is_empty() => {
                Some(Self::Message {
                    thread_id: (*tid).to_string(),
                    message_id: (*mid).to_string(),
                })
            }
            _ => None,
        }
    }

    /// The selected (thread, message) pair, if this route carries one.
    pub fn selected(&self) -> Option<(&str, &str)> {
        match self {
            Self::ThreadList => None,
            Self::Message {
                thread_id,
                message_id,
            } => Some((thread_id, message_id)),
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, Self::Message { .. })
    }
}
