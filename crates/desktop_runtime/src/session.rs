//! The addressable desktop session: one profile, one window manager, one lock.
//!
//! Every mutation is a [`DesktopAction`] applied by [`reduce_desktop`] while holding the session
//! lock, so operations never interleave partially. The lock is released before any effect runs;
//! the only long wait is a chat send awaiting its reply, during which every other window and
//! thread stays usable.

use std::sync::Arc;

use desktop_app_chat::{ChatMessage, ChatThread};
use desktop_app_games::{
    DoodleState, GameKind, GuessResult, RpsChoice, RpsRound, RpsScore, RpsState, StrokeSegment,
};
use parking_lot::Mutex;
use platform_host::{unix_time_ms_now, HostCapabilities, SessionHost};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use thiserror::Error;

use crate::{
    config::SessionConfig,
    effect_executor::run_runtime_effect,
    model::{
        AppKind, AppState, AvatarRef, DesktopState, ProfileError, UserProfile, WindowHandle,
        WindowId, WindowPosition, WindowRecord,
    },
    persistence,
    profile::ProfileStore,
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error("onboarding already completed")]
    AlreadyOnboarded,
    #[error("onboarding has not been completed")]
    NotOnboarded,
    /// The in-memory change was applied but the profile record could not be written.
    #[error("profile storage failed: {0}")]
    Storage(String),
}

struct SessionCore {
    desktop: DesktopState,
    rng: Box<dyn RngCore + Send>,
}

struct SessionInner {
    core: Mutex<SessionCore>,
    host: SessionHost,
    config: SessionConfig,
}

/// Shared handle to one desktop session. Clones address the same session.
#[derive(Clone)]
pub struct DesktopSession {
    inner: Arc<SessionInner>,
}

impl std::fmt::Debug for DesktopSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopSession")
            .field("config", &self.inner.config)
            .field("windows", &self.inner.core.lock().desktop.windows.len())
            .finish_non_exhaustive()
    }
}

impl DesktopSession {
    /// Creates a session with no profile loaded.
    pub fn new(host: SessionHost, config: SessionConfig) -> Self {
        Self::with_rng(host, config, StdRng::from_entropy())
    }

    /// Creates a session drawing game randomness from `rng`.
    pub fn with_rng(
        host: SessionHost,
        config: SessionConfig,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self::from_parts(host, config, ProfileStore::default(), Box::new(rng))
    }

    /// Creates a session and loads the stored profile record once.
    ///
    /// A missing record means onboarding is required. An unreadable or invalid record is logged
    /// and treated the same way; it is never fatal. Hosts without durable profile storage skip
    /// the read.
    pub async fn boot(host: SessionHost, config: SessionConfig) -> Self {
        let capabilities = host.capabilities;
        let loaded = if capabilities.durable_profile.is_available() {
            match persistence::load_profile(host.prefs.as_ref(), &config.profile_key).await {
                Ok(profile) => profile,
                Err(err) => {
                    tracing::warn!(key = %config.profile_key, error = %err, "profile load failed");
                    None
                }
            }
        } else {
            None
        };
        tracing::info!(
            onboarded = loaded.is_some(),
            durable_profile = capabilities.durable_profile.is_available(),
            chat_replies = capabilities.chat_replies.is_available(),
            "desktop session booted"
        );
        Self::from_parts(
            host,
            config,
            ProfileStore::from_loaded(loaded),
            Box::new(StdRng::from_entropy()),
        )
    }

    fn from_parts(
        host: SessionHost,
        config: SessionConfig,
        profile: ProfileStore,
        rng: Box<dyn RngCore + Send>,
    ) -> Self {
        let desktop = DesktopState {
            profile,
            window_limit: config.max_open_windows,
            ..DesktopState::default()
        };
        Self {
            inner: Arc::new(SessionInner {
                core: Mutex::new(SessionCore { desktop, rng }),
                host,
                config,
            }),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// What the host behind this session can actually do.
    pub fn capabilities(&self) -> HostCapabilities {
        self.inner.host.capabilities
    }

    /// Applies one action atomically and reads from the resulting state under the same lock.
    fn dispatch_then<T>(
        &self,
        action: DesktopAction,
        read: impl FnOnce(&DesktopState) -> T,
    ) -> Result<(Vec<RuntimeEffect>, T), ReducerError> {
        let mut core = self.inner.core.lock();
        let SessionCore { desktop, rng } = &mut *core;
        let effects = reduce_desktop(desktop, rng.as_mut(), action)?;
        Ok((effects, read(desktop)))
    }

    /// Like [`Self::dispatch_then`], but treats rejection as ignored input.
    fn dispatch_or_ignore<T>(
        &self,
        action: DesktopAction,
        read: impl FnOnce(&DesktopState) -> T,
    ) -> Option<(Vec<RuntimeEffect>, T)> {
        match self.dispatch_then(action, read) {
            Ok(applied) => Some(applied),
            Err(err) => {
                tracing::debug!(error = %err, "action ignored");
                None
            }
        }
    }

    fn read<T>(&self, read: impl FnOnce(&DesktopState) -> T) -> T {
        read(&self.inner.core.lock().desktop)
    }

    fn read_window<T>(
        &self,
        window_id: WindowId,
        read: impl FnOnce(&WindowRecord) -> Option<T>,
    ) -> Option<T> {
        self.read(|state| state.windows.get(window_id).and_then(read))
    }

    /// Runs effects in order. Follow-up actions are fed back into the reducer.
    async fn run_effects(&self, effects: Vec<RuntimeEffect>) -> Result<(), SessionError> {
        let mut first_error = None;
        for effect in effects {
            match run_runtime_effect(&self.inner.host, &self.inner.config, effect).await {
                Ok(Some(action)) => {
                    self.dispatch_or_ignore(action, |_| ());
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "profile storage effect failed");
                    first_error.get_or_insert(SessionError::Storage(err));
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // ---- profile ----------------------------------------------------------------------------

    pub fn needs_onboarding(&self) -> bool {
        self.read(|state| state.profile.needs_onboarding())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read(|state| state.profile.get().cloned())
    }

    /// Validates and stores the onboarding profile, then writes the profile record.
    ///
    /// # Errors
    ///
    /// * [`SessionError::Profile`] for invalid input.
    /// * [`SessionError::AlreadyOnboarded`] when a profile already exists.
    /// * [`SessionError::Storage`] when the record write fails; the profile is still active.
    pub async fn complete_onboarding(
        &self,
        name: &str,
        timezone: &str,
    ) -> Result<UserProfile, SessionError> {
        let profile = UserProfile::new(name, timezone)?;
        let (effects, ()) = self
            .dispatch_then(
                DesktopAction::CompleteOnboarding {
                    profile: profile.clone(),
                },
                |_| (),
            )
            .map_err(|_| SessionError::AlreadyOnboarded)?;
        tracing::info!(timezone = profile.timezone(), "onboarding completed");
        self.run_effects(effects).await?;
        Ok(profile)
    }

    /// Attaches a captured avatar and rewrites the profile record.
    ///
    /// # Errors
    ///
    /// * [`SessionError::NotOnboarded`] before onboarding.
    /// * [`SessionError::Storage`] when the record write fails; the avatar is still set.
    pub async fn set_avatar(&self, avatar: AvatarRef) -> Result<UserProfile, SessionError> {
        let (effects, profile) = self
            .dispatch_then(DesktopAction::SetAvatar { avatar }, |state| {
                state.profile.get().cloned()
            })
            .map_err(|_| SessionError::NotOnboarded)?;
        self.run_effects(effects).await?;
        profile.ok_or(SessionError::NotOnboarded)
    }

    /// Forgets the profile, closes every window, resets the score, and deletes the record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] when the record delete fails; the session is still
    /// logged out in memory.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let Some((effects, ())) = self.dispatch_or_ignore(DesktopAction::Logout, |_| ()) else {
            return Ok(());
        };
        tracing::info!("session logged out");
        self.run_effects(effects).await
    }

    // ---- windows ----------------------------------------------------------------------------

    /// Opens a focused window with fresh state.
    ///
    /// Returns `None` only when [`SessionConfig::max_open_windows`] is set and reached.
    pub fn open_window(&self, app_kind: AppKind) -> Option<WindowHandle> {
        let (_, handle) = self.dispatch_or_ignore(DesktopAction::OpenWindow { app_kind }, |state| {
            state.windows.list().pop()
        })?;
        if let Some(handle) = &handle {
            tracing::info!(window = %handle.id, ?app_kind, "window opened");
        }
        handle
    }

    /// Closes a window and discards its state. Unknown ids are ignored.
    pub fn close_window(&self, window_id: WindowId) {
        if self
            .dispatch_or_ignore(DesktopAction::CloseWindow { window_id }, |_| ())
            .is_some()
        {
            tracing::info!(window = %window_id, "window closed");
        }
    }

    /// Focuses and raises a window. Unknown ids are ignored.
    pub fn focus_window(&self, window_id: WindowId) {
        self.dispatch_or_ignore(DesktopAction::FocusWindow { window_id }, |_| ());
    }

    /// Moves a window. Unknown ids are ignored.
    pub fn move_window(&self, window_id: WindowId, position: WindowPosition) {
        self.dispatch_or_ignore(
            DesktopAction::MoveWindow {
                window_id,
                position,
            },
            |_| (),
        );
    }

    /// Open windows, back to front.
    pub fn windows(&self) -> Vec<WindowHandle> {
        self.read(|state| state.windows.list())
    }

    pub fn window(&self, window_id: WindowId) -> Option<WindowHandle> {
        self.read_window(window_id, |window| Some(window.handle()))
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.read(|state| state.windows.focused())
    }

    /// Snapshot of a window's application state.
    pub fn app_state(&self, window_id: WindowId) -> Option<AppState> {
        self.read_window(window_id, |window| Some(window.app_state.clone()))
    }

    // ---- games ------------------------------------------------------------------------------

    pub fn select_game(&self, window_id: WindowId, game: GameKind) {
        self.dispatch_or_ignore(DesktopAction::SelectGame { window_id, game }, |_| ());
    }

    /// Plays one RPS round. Returns `None` if the window is not a games window.
    pub fn play_rps(&self, window_id: WindowId, choice: RpsChoice) -> Option<RpsRound> {
        let (_, round) = self.dispatch_or_ignore(
            DesktopAction::PlayRps { window_id, choice },
            |state| {
                state
                    .windows
                    .get(window_id)
                    .and_then(|window| window.app_state.rps())
                    .and_then(|rps| rps.last_result().copied())
            },
        )?;
        round
    }

    pub fn reset_rps(&self, window_id: WindowId) {
        self.dispatch_or_ignore(DesktopAction::ResetRps { window_id }, |_| ());
    }

    pub fn rps_state(&self, window_id: WindowId) -> Option<RpsState> {
        self.read_window(window_id, |window| window.app_state.rps().cloned())
    }

    /// Session-wide RPS score.
    pub fn rps_score(&self) -> RpsScore {
        self.read(|state| state.rps_score)
    }

    /// Starts a doodle round and returns the word to draw.
    pub fn start_doodle_round(&self, window_id: WindowId) -> Option<String> {
        let (_, word) = self.dispatch_or_ignore(
            DesktopAction::StartDoodleRound { window_id },
            |state| {
                state
                    .windows
                    .get(window_id)
                    .and_then(|window| window.app_state.doodle())
                    .map(|doodle| doodle.target_word().to_string())
            },
        )?;
        word
    }

    /// Adds a stroke. Ignored unless the doodle is in its drawing phase.
    pub fn add_doodle_stroke(&self, window_id: WindowId, segment: StrokeSegment) {
        self.dispatch_or_ignore(
            DesktopAction::AddDoodleStroke { window_id, segment },
            |_| (),
        );
    }

    pub fn clear_doodle(&self, window_id: WindowId) {
        self.dispatch_or_ignore(DesktopAction::ClearDoodle { window_id }, |_| ());
    }

    /// Submits the drawing. Every submitted round is guessed correctly.
    pub fn submit_doodle_guess(&self, window_id: WindowId) -> Option<GuessResult> {
        let (_, result) = self.dispatch_or_ignore(
            DesktopAction::SubmitDoodleGuess { window_id },
            |state| {
                state
                    .windows
                    .get(window_id)
                    .and_then(|window| window.app_state.doodle())
                    .and_then(|doodle| doodle.guess_result().cloned())
            },
        )?;
        result
    }

    pub fn doodle_state(&self, window_id: WindowId) -> Option<DoodleState> {
        self.read_window(window_id, |window| window.app_state.doodle().cloned())
    }

    // ---- chat -------------------------------------------------------------------------------

    pub fn chat_thread(&self, window_id: WindowId, contact_id: &str) -> Option<ChatThread> {
        self.read_window(window_id, |window| {
            window.app_state.as_chat()?.thread(contact_id).cloned()
        })
    }

    /// Whether the contact is composing a reply in that window. Advisory only.
    pub fn is_typing(&self, window_id: WindowId, contact_id: &str) -> bool {
        self.read_window(window_id, |window| {
            Some(window.app_state.as_chat()?.is_typing(contact_id))
        })
        .unwrap_or(false)
    }

    /// Sends `text` to a contact and waits for the reply.
    ///
    /// The user message is visible immediately; this future then resolves once the reply (or a
    /// fallback, on any failure or after [`SessionConfig::reply_timeout_ms`]) has been appended,
    /// returning that assistant message. Returns `None` if the send was rejected (blank text,
    /// reply already in flight, not a chat window) or the window closed before the reply came.
    ///
    /// The reply is awaited on a spawned task: dropping this future does not cancel the send, and
    /// the thread still returns to idle once the reply or fallback lands. Must be called inside a
    /// Tokio runtime with the time driver enabled.
    pub async fn send_chat(
        &self,
        window_id: WindowId,
        contact_id: &str,
        text: &str,
    ) -> Option<ChatMessage> {
        let (effects, ()) = self.dispatch_or_ignore(
            DesktopAction::BeginChatSend {
                window_id,
                contact_id: contact_id.to_string(),
                text: text.to_string(),
                now_ms: unix_time_ms_now(),
            },
            |_| (),
        )?;


        // Completion must land even if the caller drops this future.
        let completion = tokio::spawn(self.clone().finish_chat_send(
            window_id,
            contact_id.trim().to_string(),
            effects,
        ));
        match completion.await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(window = %window_id, error = %err, "chat completion task failed");
                None
            }
        }
    }

    async fn finish_chat_send(
        self,
        window_id: WindowId,
        contact_id: String,
        effects: Vec<RuntimeEffect>,
    ) -> Option<ChatMessage> {
        let mut reply = None;
        for effect in effects {
            let completion =
                match run_runtime_effect(&self.inner.host, &self.inner.config, effect).await {
                    Ok(completion) => completion,
                    Err(err) => {
                        tracing::warn!(error = %err, "chat effect failed");
                        continue;
                    }
                };
            let Some(action @ DesktopAction::CompleteChatSend { .. }) = completion else {
                continue;
            };
            match self.dispatch_then(action, |state| {
                state
                    .windows
                    .get(window_id)?
                    .app_state
                    .as_chat()?
                    .thread(&contact_id)?
                    .messages()
                    .last()
                    .cloned()
            }) {
                Ok((_, message)) => reply = message,
                Err(err) => {
                    tracing::debug!(window = %window_id, error = %err, "reply discarded");
                }
            }
        }
        reply
    }

    /// [`Self::send_chat`] addressed to [`SessionConfig::default_contact`].
    pub async fn send_to_default_contact(
        &self,
        window_id: WindowId,
        text: &str,
    ) -> Option<ChatMessage> {
        let contact = self.inner.config.default_contact.clone();
        self.send_chat(window_id, &contact, text).await
    }
}
