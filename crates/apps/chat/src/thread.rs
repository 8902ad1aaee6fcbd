use platform_host::{ReplyError, ReplyMessage, ReplyResponse, ReplyRole};
use serde::{Deserialize, Serialize};

use crate::fallback::fallback_message;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ReplyRole,
    pub content: String,
    pub timestamp_unix_ms: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreadStatus {
    #[default]
    Idle,
    /// A reply request is in flight; further sends are rejected.
    Sending,
}

/// Append-only conversation with one contact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatThread {
    messages: Vec<ChatMessage>,
    status: ThreadStatus,
    next_message_id: u64,
}

impl Default for ChatThread {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            status: ThreadStatus::Idle,
            next_message_id: 1,
        }
    }
}

impl ChatThread {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn status(&self) -> ThreadStatus {
        self.status
    }

    pub fn is_typing(&self) -> bool {
        self.status == ThreadStatus::Sending
    }

    pub(crate) fn begin_send(&mut self, text: &str, now_ms: u64) -> Option<Vec<ReplyMessage>> {
        let text = text.trim();
        if text.is_empty() || self.is_typing() {
            return None;
        }
        self.append(ReplyRole::User, text.to_string(), now_ms);
        self.status = ThreadStatus::Sending;
        Some(
            self.messages
                .iter()
                .map(|message| ReplyMessage {
                    role: message.role,
                    content: message.content.clone(),
                })
                .collect(),
        )
    }

    pub(crate) fn complete_send(
        &mut self,
        outcome: Result<ReplyResponse, ReplyError>,
        now_ms: u64,
    ) -> Option<&ChatMessage> {
        if !self.is_typing() {
            return None;
        }
        let content = match outcome {
            Ok(response) if !response.content.trim().is_empty() => response.content,
            Ok(_) => fallback_message(&ReplyError::Malformed("empty reply".to_string())).to_string(),
            Err(err) => fallback_message(&err).to_string(),
        };
        self.append(ReplyRole::Assistant, content, now_ms);
        self.status = ThreadStatus::Idle;
        self.messages.last()
    }

    fn append(&mut self, role: ReplyRole, content: String, now_ms: u64) {
        // Clock steps must never reorder a thread.
        let timestamp_unix_ms = self
            .messages
            .last()
            .map_or(now_ms, |last| now_ms.max(last.timestamp_unix_ms));
        self.messages.push(ChatMessage {
            id: self.next_message_id,
            role,
            content,
            timestamp_unix_ms,
        });
        self.next_message_id += 1;
    }
}
