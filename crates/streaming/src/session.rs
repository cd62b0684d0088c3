use foundation::{IdAllocator, MessageId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::Utf8StreamDecoder;
use crate::message::{ChatMessage, Conversation, Sender};
use crate::protocol::{ChatRequest, FALLBACK_TEXT};
use crate::transport::TransportFailure;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    #[default]
    Idle,
    /// Request dispatched, no response yet.
    Sending,
    /// Response body is being read into the current assistant message.
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEvent {
    Submit,
    ResponseStarted,
    Chunk,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// Blank submission; ignored without touching the conversation.
    #[error("input is empty")]
    EmptyInput,
    /// A response is still in flight.
    #[error("a response is already in progress ({0:?})")]
    Busy(ChatState),
    #[error("cannot handle {event:?} while {state:?}")]
    InvalidTransition { state: ChatState, event: ChatEvent },
}

/// Conversation state machine.
///
/// ```text
/// Idle --submit--> Sending --response--> Streaming --finish--> Idle
///                     |                      |
///                     +------- fail ---------+-------------> Idle
/// ```
///
/// Every method either applies its transition completely or returns an error
/// and leaves the session untouched.
#[derive(Debug, Default)]
pub struct ChatSession {
    conversation: Conversation,
    state: ChatState,
    ids: IdAllocator,
    draft: String,
    current: Option<MessageId>,
    decoder: Utf8StreamDecoder,
    last_failure: Option<TransportFailure>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn is_typing(&self) -> bool {
        self.conversation.is_typing()
    }

    /// Text of the input box.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// The assistant message being streamed, if any.
    pub fn current_response(&self) -> Option<&ChatMessage> {
        self.current.and_then(|id| self.conversation.get(id))
    }

    /// Failure that ended the most recent request, cleared on the next submit.
    pub fn last_failure(&self) -> Option<&TransportFailure> {
        self.last_failure.as_ref()
    }

    /// Submit the draft.
    ///
    /// Appends the trimmed draft as a user message, clears the draft and
    /// moves to `Sending`. Blank drafts and submissions while a response is
    /// in flight are rejected and change nothing.
    pub fn submit(&mut self) -> Result<ChatRequest, ChatError> {
        if self.state != ChatState::Idle {
            return Err(ChatError::Busy(self.state));
        }
        let text = self.draft.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        let request = ChatRequest::new(text);

        let id = self.ids.next_id();
        self.conversation.push(id, Sender::User, request.query.clone());
        self.draft.clear();
        self.last_failure = None;
        self.conversation.set_typing(true);
        self.transition(ChatState::Sending, ChatEvent::Submit);
        Ok(request)
    }

    /// Replace the draft with `text` and submit it.
    pub fn submit_text(&mut self, text: &str) -> Result<ChatRequest, ChatError> {
        self.set_draft(text);
        self.submit()
    }

    /// A successful response with a readable body arrived: open an empty
    /// assistant message for it.
    pub fn begin_response(&mut self) -> Result<MessageId, ChatError> {
        self.expect_state(&[ChatState::Sending], ChatEvent::ResponseStarted)?;
        let id = self.ids.next_id();
        self.conversation.push(id, Sender::Assistant, String::new());
        self.current = Some(id);
        self.decoder.reset();
        self.transition(ChatState::Streaming, ChatEvent::ResponseStarted);
        Ok(id)
    }

    /// Append a body chunk to the current assistant message.
    pub fn apply_chunk(&mut self, chunk: &[u8]) -> Result<(), ChatError> {
        self.expect_state(&[ChatState::Streaming], ChatEvent::Chunk)?;
        let Some(id) = self.current else {
            return Err(self.invalid(ChatEvent::Chunk));
        };
        let text = self.decoder.decode(chunk);
        if !text.is_empty() {
            self.conversation.append_text(id, &text);
        }
        Ok(())
    }

    /// End of stream. No further chunks are accepted for this request.
    pub fn finish(&mut self) -> Result<(), ChatError> {
        self.expect_state(&[ChatState::Streaming], ChatEvent::Finished)?;
        let tail = self.decoder.finish();
        if let Some(id) = self.current.take()
            && !tail.is_empty()
        {
            self.conversation.append_text(id, &tail);
        }
        self.conversation.set_typing(false);
        self.transition(ChatState::Idle, ChatEvent::Finished);
        Ok(())
    }

    /// The request failed before or during streaming.
    ///
    /// Appends the fallback message; a partially streamed message stays in
    /// the conversation in front of it.
    pub fn fail(&mut self, failure: &TransportFailure) -> Result<(), ChatError> {
        self.expect_state(&[ChatState::Sending, ChatState::Streaming], ChatEvent::Failed)?;
        warn!(%failure, state = ?self.state, "chat request failed");
        self.decoder.reset();
        self.current = None;
        let id = self.ids.next_id();
        self.conversation.push(id, Sender::Assistant, FALLBACK_TEXT);
        self.conversation.set_typing(false);
        self.last_failure = Some(failure.clone());
        self.transition(ChatState::Idle, ChatEvent::Failed);
        Ok(())
    }

    fn expect_state(&self, allowed: &[ChatState], event: ChatEvent) -> Result<(), ChatError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(event))
        }
    }

    fn invalid(&self, event: ChatEvent) -> ChatError {
        ChatError::InvalidTransition {
            state: self.state,
            event,
        }
    }

    fn transition(&mut self, to: ChatState, event: ChatEvent) {
        debug!(from = ?self.state, to = ?to, event = ?event, messages = self.conversation.len(), "chat transition");
        self.state = to;
    }
}
