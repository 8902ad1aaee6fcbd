//! Network implementations of [`platform_host`] service contracts.
//!
//! The only network-facing service of the desktop session is the chat reply collaborator.
//! [`HttpReplyService`] speaks the OpenAI-compatible `chat/completions` wire format and maps every
//! failure shape onto [`platform_host::ReplyError`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod reply;

pub use config::{
    ReplyEndpointConfig, DEFAULT_REPLY_ENDPOINT, DEFAULT_REPLY_MODEL, REPLY_API_KEY_ENV,
    REPLY_ENDPOINT_ENV, REPLY_MODEL_ENV,
};
pub use reply::HttpReplyService;
