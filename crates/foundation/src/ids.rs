/// Identifier of a chat message.
///
/// Ordering follows issue order: an id compares greater than every id issued
/// before it by the same [`IdAllocator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(n: u64) -> Self {
        MessageId(n)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing [`MessageId`]s.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start issuing after `last`, e.g. when resuming from existing messages.
    pub fn starting_after(last: MessageId) -> Self {
        Self { last: last.0 }
    }

    pub fn next_id(&mut self) -> MessageId {
        self.last += 1;
        MessageId(self.last)
    }

    /// The most recently issued id, if any.
    pub fn last_issued(&self) -> Option<MessageId> {
        (self.last > 0).then_some(MessageId(self.last))
    }
}
