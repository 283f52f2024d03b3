//! Conversation transcript types.
//!
//! The transcript is an ordered, append-only list of messages. The only
//! mutation besides appending is removing the transient "thinking"
//! placeholder by id once a request resolves; entries are never edited or
//! reordered.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    User,
    Model,
    System,
    Error,
}

impl Sender {
    /// Label shown next to the entry (and in exports).
    pub fn display_name(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Model => "Gemini",
            Sender::System => "System",
            Sender::Error => "Error",
        }
    }
}

/// One transcript entry. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    /// Text as typed or as returned by the model.
    pub raw_text: String,
    /// Derived display form. Markdown-rendered for Model senders, escaped
    /// plain text for User, caller-supplied markup for System/Error.
    pub rendered_html: String,
    pub timestamp: String,
}

impl Message {
    pub fn new(
        sender: Sender,
        raw_text: impl Into<String>,
        rendered_html: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            raw_text: raw_text.into(),
            rendered_html: rendered_html.into(),
            timestamp: Utc::now().format("%H:%M").to_string(),
        }
    }
}

/// Ordered message list backing the panel history.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its id.
    pub fn append(&mut self, message: Message) -> Uuid {
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// Remove a message by id. Returns false if no entry matched.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        self.messages.len() != before
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut t = Transcript::new();
        t.append(Message::new(Sender::User, "first", "first"));
        t.append(Message::new(Sender::Model, "second", "second"));
        t.append(Message::new(Sender::System, "third", "third"));

        let raw: Vec<_> = t.iter().map(|m| m.raw_text.as_str()).collect();
        assert_eq!(raw, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut t = Transcript::new();
        for i in 0..50 {
            t.append(Message::new(Sender::User, format!("msg {i}"), ""));
        }
        let mut ids: Vec<_> = t.iter().map(|m| m.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_remove_by_id() {
        let mut t = Transcript::new();
        t.append(Message::new(Sender::User, "keep", "keep"));
        let pending = t.append(Message::new(Sender::System, "Thinking...", "Thinking..."));
        t.append(Message::new(Sender::Model, "answer", "answer"));

        assert!(t.remove(pending));
        assert_eq!(t.len(), 2);
        assert!(t.iter().all(|m| m.id != pending));
        // A second removal is a no-op.
        assert!(!t.remove(pending));
    }
}
