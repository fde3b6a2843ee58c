use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::text;
use crate::aggregator::BlockReport;

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    System,
}

/// Block data attached to a system reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub block_number: String,
    pub block_info: Option<Value>,
    pub timestamp: String,
}

impl From<BlockReport> for BlockSnapshot {
    fn from(report: BlockReport) -> Self {
        Self {
            block_number: report.block_number,
            block_info: report.block_info,
            timestamp: report.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub origin: Origin,
    pub text: String,
    pub block: Option<BlockSnapshot>,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(origin: Origin, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            origin,
            text: text.into(),
            block: None,
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Origin::User, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Origin::System, text)
    }

    pub fn with_block(mut self, block: BlockSnapshot) -> Self {
        self.block = Some(block);
        self
    }

    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }
}

/// Append-only conversation history.
///
/// Messages are never edited. The only non-append operations are
/// [`replace_last`](Self::replace_last), which swaps the trailing
/// placeholder for the real reply, and
/// [`reset_with_greeting`](Self::reset_with_greeting).
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    /// A log holding only the greeting.
    pub fn new() -> Self {
        let mut log = Self::default();
        log.reset_with_greeting();
        log
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Removes the last message (if any) and appends `message`.
    pub fn replace_last(&mut self, message: ChatMessage) {
        self.messages.pop();
        self.messages.push(message);
    }

    pub fn reset_with_greeting(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::system(text::GREETING));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
