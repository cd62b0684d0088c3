use foundation::MessageId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single chat message.
///
/// Text can only grow, and only through the owning [`Conversation`] while the
/// message is the response currently being streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    id: MessageId,
    text: String,
    sender: Sender,
}

impl ChatMessage {
    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered messages plus the "assistant is producing a response" flag.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    is_typing: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.id == id)
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub(crate) fn set_typing(&mut self, typing: bool) {
        self.is_typing = typing;
    }

    pub(crate) fn push(&mut self, id: MessageId, sender: Sender, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            id,
            text: text.into(),
            sender,
        });
    }

    /// Append to the message with `id`. Returns `false` if there is none.
    pub(crate) fn append_text(&mut self, id: MessageId, text: &str) -> bool {
        match self.messages.iter_mut().rev().find(|m| m.id == id) {
            Some(message) => {
                message.text.push_str(text);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Conversation, Sender};
    use foundation::MessageId;

    #[test]
    fn append_keeps_identity_and_count() {
        let mut conv = Conversation::new();
        conv.push(MessageId::new(1), Sender::User, "hi");
        conv.push(MessageId::new(2), Sender::Assistant, "");

        assert!(conv.append_text(MessageId::new(2), "Hel"));
        assert!(conv.append_text(MessageId::new(2), "lo"));
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.get(MessageId::new(2)).map(|m| m.text()), Some("Hello"));
        assert_eq!(conv.get(MessageId::new(1)).map(|m| m.text()), Some("hi"));
        assert!(!conv.append_text(MessageId::new(9), "x"));
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Assistant).unwrap(), r#""assistant""#);
    }
}
