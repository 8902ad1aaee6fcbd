//! Typed host-domain contracts shared by the desktop session core and its host adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the lightweight
//! preference store used for the session profile record, the reply-collaborator contract
//! consumed by the chat pipeline, and the [`SessionHost`] bundle that carries both into
//! `desktop_runtime`. Concrete network adapters live in `platform_host_http`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod host;
pub mod reply;
pub mod storage;
pub mod time;

pub use host::{CapabilityStatus, HostCapabilities, SessionHost};
pub use reply::{
    ReplyError, ReplyFuture, ReplyMessage, ReplyRequest, ReplyResponse, ReplyRole, ReplyService,
    UnconfiguredReplyService,
};
pub use storage::prefs::{
    delete_pref_with, load_pref_with, save_pref_with, MemoryPrefsStore, NoopPrefsStore,
    PrefsStore, PrefsStoreFuture,
};
pub use time::unix_time_ms_now;
