//! Host-service bundle and capability models for session composition.

use std::sync::Arc;

use crate::{
    MemoryPrefsStore, NoopPrefsStore, PrefsStore, ReplyService, UnconfiguredReplyService,
};

/// Host availability state for one optional capability domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    /// Capability is available.
    Available,
    /// Capability is not implemented or not configured on the active host.
    Unavailable,
}

impl CapabilityStatus {
    /// Returns whether the capability can be used immediately.
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Host capability snapshot exposed to session wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Durable storage for the profile record.
    pub durable_profile: CapabilityStatus,
    /// Real assistant replies (as opposed to fallback-only chat).
    pub chat_replies: CapabilityStatus,
}

impl HostCapabilities {
    /// Posture of a fully wired host.
    pub const fn full() -> Self {
        Self {
            durable_profile: CapabilityStatus::Available,
            chat_replies: CapabilityStatus::Available,
        }
    }

    /// Posture of a host with no durable storage and no reply collaborator.
    pub const fn offline() -> Self {
        Self {
            durable_profile: CapabilityStatus::Unavailable,
            chat_replies: CapabilityStatus::Unavailable,
        }
    }
}

/// Host service bundle injected into the desktop session.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the session core decoupled from storage and network adapters.
#[derive(Clone)]
pub struct SessionHost {
    /// Lightweight typed preference store holding the profile record.
    pub prefs: Arc<dyn PrefsStore>,
    /// Reply collaborator used by the chat pipeline.
    pub replies: Arc<dyn ReplyService>,
    /// Host availability snapshot.
    pub capabilities: HostCapabilities,
}

impl SessionHost {
    /// Builds a host from explicit services.
    pub fn new(prefs: Arc<dyn PrefsStore>, replies: Arc<dyn ReplyService>) -> Self {
        Self {
            prefs,
            replies,
            capabilities: HostCapabilities::full(),
        }
    }

    /// Host with no durable storage and no reply collaborator. Chat degrades to fallbacks.
    pub fn offline() -> Self {
        Self {
            prefs: Arc::new(NoopPrefsStore),
            replies: Arc::new(UnconfiguredReplyService),
            capabilities: HostCapabilities::offline(),
        }
    }

    /// Host backed by an in-memory prefs store and the supplied reply service.
    pub fn in_memory(prefs: MemoryPrefsStore, replies: Arc<dyn ReplyService>) -> Self {
        Self::new(Arc::new(prefs), replies)
    }
}

impl std::fmt::Debug for SessionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHost")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}
