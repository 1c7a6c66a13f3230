use bitflags::bitflags;

use crate::constants::BODY_WRAP_COLS;

pub type ThreadId = String;
pub type MessageId = String;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MessageFlags: u32 {
        const UNREAD = 0b00000001;
        const STARRED = 0b00000010;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub subject: String,
    pub from: String,
    pub snippet: String,
    /// Unix timestamp in seconds
    pub date: i64,
    pub flags: MessageFlags,
}

impl Message {
    pub fn is_unread(&self) -> bool {
        self.flags.contains(MessageFlags::UNREAD)
    }

    pub fn is_starred(&self) -> bool {
        self.flags.contains(MessageFlags::STARRED)
    }

    /// Sender's display name: the part of the From header before `<addr>`,
    /// or the bare address when there is no name part.
    pub fn display_from(&self) -> &str {
        match self.from.split_once('<') {
            Some((name, _)) if !name.trim().is_empty() => name.trim().trim_matches('"').trim(),
            _ => self.from.trim_start_matches('<').trim_end_matches('>'),
        }
    }
}

/// A conversation as returned by the API.
/// Messages are sorted by date ascending within the thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub id: ThreadId,
    pub messages: Vec<Message>,
}

impl Thread {
    /// The most recent message, the one the list row and navigation use.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn has_unread(&self) -> bool {
        self.messages.iter().any(|m| m.is_unread())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

/// One page of the thread list for a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadPage {
    pub threads: Vec<Thread>,
    /// Whether the server reported more results past this page.
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub unread_threads: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageBody {
    pub text: Option<String>,
    pub html: Option<String>,
}

impl MessageBody {
    /// Get displayable text content
    /// Returns plain text if available, otherwise strips HTML tags from HTML content
    pub fn display_text(&self) -> String {
        if let Some(ref text) = self.text {
            text.clone()
        } else if let Some(ref html) = self.html {
            html2text::from_read(html.as_bytes(), BODY_WRAP_COLS)
        } else {
            "[No content]".to_string()
        }
    }
}

/// Authorization state of the API session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Startup probe still in flight.
    #[default]
    Authorizing,
    Authorized,
    Unauthorized,
}

impl AuthState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    pub fn is_authorizing(&self) -> bool {
        matches!(self, Self::Authorizing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, from: &str, flags: MessageFlags) -> Message {
        Message {
            id: id.to_string(),
            thread_id: "t1".to_string(),
            subject: "Test".to_string(),
            from: from.to_string(),
            snippet: String::new(),
            date: 0,
            flags,
        }
    }

    #[test]
    fn test_display_from_strips_address_part() {
        let msg = message("m1", "Ada Lovelace <ada@example.com>", MessageFlags::empty());
        assert_eq!(msg.display_from(), "Ada Lovelace");
    }

    #[test]
    fn test_display_from_falls_back_to_bare_address() {
        let msg = message("m1", "<ada@example.com>", MessageFlags::empty());
        assert_eq!(msg.display_from(), "ada@example.com");
    }

    #[test]
    fn test_thread_reports_unread_and_newest_message() {
        let thread = Thread {
            id: "t1".to_string(),
            messages: vec![
                message("m1", "a@example.com", MessageFlags::empty()),
                message("m2", "b@example.com", MessageFlags::UNREAD),
            ],
        };
        assert!(thread.has_unread());
        assert_eq!(thread.last_message().map(|m| m.id.as_str()), Some("m2"));
    }
}
