//! Chat app state: contacts, per-contact threads, and the send/reply protocol.
//!
//! A thread moves `Idle -> Sending -> Idle`. [`ChatState::begin_send`] performs the optimistic
//! append and hands back the request for the reply collaborator; [`ChatState::complete_send`]
//! appends exactly one assistant message, real or fallback, and returns the thread to idle.
//! Neither side performs I/O, so the host decides how the request is awaited.

mod fallback;
mod persona;
mod thread;

pub use fallback::fallback_message;
pub use persona::{contact, Contact, PersonaContext, DEFAULT_CONTACTS, DEFAULT_CONTACT_ID};
pub use thread::{ChatMessage, ChatThread, ThreadStatus};

use std::collections::BTreeMap;

use platform_host::{ReplyError, ReplyRequest, ReplyResponse};
use serde::{Deserialize, Serialize};

/// All threads of one chat window, keyed by contact id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatState {
    threads: BTreeMap<String, ChatThread>,
}

impl ChatState {
    pub fn thread(&self, contact_id: &str) -> Option<&ChatThread> {
        self.threads.get(contact_id)
    }

    pub fn threads(&self) -> impl Iterator<Item = (&str, &ChatThread)> {
        self.threads.iter().map(|(id, thread)| (id.as_str(), thread))
    }

    /// Whether the contact is currently composing a reply.
    pub fn is_typing(&self, contact_id: &str) -> bool {
        self.thread(contact_id).is_some_and(ChatThread::is_typing)
    }

    /// Appends the user's message and returns the reply request to issue.
    ///
    /// Returns `None` without touching state when the text is blank, the contact id is blank, or
    /// the thread already has a reply in flight.
    pub fn begin_send(
        &mut self,
        contact_id: &str,
        text: &str,
        persona: &PersonaContext,
        now_ms: u64,
    ) -> Option<ReplyRequest> {
        let contact_id = contact_id.trim();
        if contact_id.is_empty() || text.trim().is_empty() || self.is_typing(contact_id) {
            return None;
        }
        let thread = self.threads.entry(contact_id.to_string()).or_default();
        let history = thread.begin_send(text, now_ms)?;
        Some(ReplyRequest {
            system_persona: persona.system_persona(contact_id),
            history,
        })
    }

    /// Resolves the in-flight send of `contact_id` with the collaborator outcome.
    ///
    /// Returns the appended assistant message, or `None` if the thread had nothing in flight.
    pub fn complete_send(
        &mut self,
        contact_id: &str,
        outcome: Result<ReplyResponse, ReplyError>,
        now_ms: u64,
    ) -> Option<&ChatMessage> {
        self.threads
            .get_mut(contact_id.trim())?
            .complete_send(outcome, now_ms)
    }
}

#[cfg(test)]
mod tests {
    use platform_host::ReplyRole;
    use pretty_assertions::assert_eq;

    use super::*;

    fn persona() -> PersonaContext {
        PersonaContext {
            user_name: Some("Ada".to_string()),
            timezone: Some("Europe/London".to_string()),
        }
    }

    #[test]
    fn unreachable_reply_leaves_user_and_fallback_messages() {
        let mut chat = ChatState::default();
        let request = chat
            .begin_send("rebecca", "hello", &persona(), 10)
            .expect("send accepted");
        assert!(chat.is_typing("rebecca"));
        assert_eq!(request.history.len(), 1);

        let error = ReplyError::Unreachable("connection refused".to_string());
        chat.complete_send("rebecca", Err(error.clone()), 20);

        let thread = chat.thread("rebecca").expect("thread");
        let pairs: Vec<_> = thread
            .messages()
            .iter()
            .map(|m| (m.role, m.content.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (ReplyRole::User, "hello"),
                (ReplyRole::Assistant, fallback_message(&error)),
            ]
        );
        assert_eq!(thread.status(), ThreadStatus::Idle);
        assert!(!chat.is_typing("rebecca"));
    }

    #[test]
    fn blank_text_and_blank_contact_are_ignored() {
        let mut chat = ChatState::default();
        assert_eq!(chat.begin_send("rebecca", "   \n", &persona(), 1), None);
        assert_eq!(chat.begin_send("  ", "hi", &persona(), 1), None);
        assert_eq!(chat.threads().count(), 0);
    }

    #[test]
    fn busy_thread_rejects_second_send_but_other_threads_proceed() {
        let mut chat = ChatState::default();
        chat.begin_send("rebecca", "one", &persona(), 1).expect("first");
        assert_eq!(chat.begin_send("rebecca", "two", &persona(), 2), None);
        assert!(chat.begin_send("sam", "hey", &persona(), 3).is_some());

        assert_eq!(chat.thread("rebecca").map(|t| t.messages().len()), Some(1));
        assert_eq!(chat.thread("sam").map(|t| t.messages().len()), Some(1));
    }

    #[test]
    fn request_carries_persona_and_full_history() {
        let mut chat = ChatState::default();
        chat.begin_send("rebecca", "hi", &persona(), 1).expect("first");
        chat.complete_send(
            "rebecca",
            Ok(ReplyResponse {
                content: "hey Ada".to_string(),
            }),
            2,
        );

        let request = chat
            .begin_send("rebecca", "what time is it?", &persona(), 3)
            .expect("second");

        assert!(request.system_persona.contains("Rebecca"));
        assert!(request.system_persona.contains("Ada"));
        let contents: Vec<_> = request.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hey Ada", "what time is it?"]);
    }

    #[test]
    fn completion_without_pending_send_is_ignored() {
        let mut chat = ChatState::default();
        let reply = Ok(ReplyResponse {
            content: "stray".to_string(),
        });
        assert_eq!(chat.complete_send("rebecca", reply, 1), None);
        assert!(chat.thread("rebecca").is_none());
    }
}
