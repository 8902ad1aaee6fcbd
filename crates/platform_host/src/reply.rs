//! Reply-collaborator contract consumed by the chat pipeline.
//!
//! The desktop core never produces assistant text itself. It hands the persona and the thread
//! history to a [`ReplyService`] and treats every failure shape the same way: as a reason to
//! substitute a fallback message.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Object-safe boxed future used by [`ReplyService`].
pub type ReplyFuture<'a, T> = BoxFuture<'a, T>;

/// Author of one history entry sent to the reply collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyRole {
    /// Message typed by the desktop user.
    User,
    /// Message produced by the contact (real or fallback).
    Assistant,
}

impl ReplyRole {
    /// Returns the stable wire label for the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One `{role, content}` history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyMessage {
    /// Message author.
    pub role: ReplyRole,
    /// Message text.
    pub content: String,
}

/// Request handed to the reply collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRequest {
    /// Persona prompt describing who is replying and to whom.
    pub system_persona: String,
    /// Full thread history, oldest first, ending with the new user message.
    pub history: Vec<ReplyMessage>,
}

/// Successful collaborator response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyResponse {
    /// Assistant text to append to the thread.
    pub content: String,
}

/// Distinguishable reply failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// The collaborator could not be reached at all.
    #[error("reply service unreachable: {0}")]
    Unreachable(String),
    /// The collaborator answered with a non-success status.
    #[error("reply service returned status {code}")]
    Status {
        /// HTTP-style status code.
        code: u16,
    },
    /// The collaborator answered with a body that could not be used.
    #[error("malformed reply: {0}")]
    Malformed(String),
    /// No credential is configured for the collaborator.
    #[error("reply service credential is missing")]
    MissingCredential,
    /// The collaborator did not answer before the session deadline.
    #[error("reply timed out after {after_ms} ms")]
    TimedOut {
        /// Deadline that elapsed, in milliseconds.
        after_ms: u64,
    },
}

/// Host service producing assistant replies for chat threads.
pub trait ReplyService: Send + Sync {
    /// Requests one reply for the supplied persona and history.
    fn request_reply<'a>(
        &'a self,
        request: &'a ReplyRequest,
    ) -> ReplyFuture<'a, Result<ReplyResponse, ReplyError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Reply service for hosts with no configured collaborator; every call fails with
/// [`ReplyError::MissingCredential`].
pub struct UnconfiguredReplyService;

impl ReplyService for UnconfiguredReplyService {
    fn request_reply<'a>(
        &'a self,
        _request: &'a ReplyRequest,
    ) -> ReplyFuture<'a, Result<ReplyResponse, ReplyError>> {
        Box::pin(async { Err(ReplyError::MissingCredential) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unconfigured_service_reports_missing_credential() {
        let service: &dyn ReplyService = &UnconfiguredReplyService;
        let request = ReplyRequest {
            system_persona: "persona".to_string(),
            history: vec![ReplyMessage {
                role: ReplyRole::User,
                content: "hello".to_string(),
            }],
        };
        assert_eq!(
            block_on(service.request_reply(&request)),
            Err(ReplyError::MissingCredential)
        );
    }

    #[test]
    fn roles_serialize_as_lowercase_labels() {
        let json = serde_json::to_string(&ReplyMessage {
            role: ReplyRole::Assistant,
            content: "hi".to_string(),
        })
        .expect("serialize");
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
        assert_eq!(ReplyRole::User.as_str(), "user");
    }
}
