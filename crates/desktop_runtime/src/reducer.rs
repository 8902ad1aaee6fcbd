//! Reducer actions, side-effect intents, and transition logic for the desktop session.

use desktop_app_chat::{ChatState, PersonaContext};
use desktop_app_games::{GameKind, GamesState, RpsChoice, StrokeSegment};
use platform_host::{ReplyError, ReplyRequest, ReplyResponse};
use rand::Rng;
use thiserror::Error;

use crate::{
    model::{AppKind, AppState, AvatarRef, DesktopState, UserProfile, WindowId, WindowPosition},
    window_manager::WindowManager,
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a new window of the given kind.
    OpenWindow {
        /// Application hosted by the window.
        app_kind: AppKind,
    },
    /// Close a window by id, discarding its state.
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Focus (and raise) a window by id.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Move a window to a new desktop position.
    MoveWindow {
        /// Window to move.
        window_id: WindowId,
        /// New top-left position.
        position: WindowPosition,
    },
    /// Store the validated onboarding profile.
    CompleteOnboarding {
        /// Profile produced by onboarding.
        profile: UserProfile,
    },
    /// Attach a captured avatar to the profile.
    SetAvatar {
        /// Avatar reference from the capture flow.
        avatar: AvatarRef,
    },
    /// Forget the profile, close all windows, and reset the session score.
    Logout,
    /// Switch the game shown in a games window.
    SelectGame {
        /// Games window.
        window_id: WindowId,
        /// Game to show.
        game: GameKind,
    },
    /// Play one RPS round against a random opponent.
    PlayRps {
        /// Games window.
        window_id: WindowId,
        /// User's move.
        choice: RpsChoice,
    },
    /// Clear the last RPS result (the score is kept).
    ResetRps {
        /// Games window.
        window_id: WindowId,
    },
    /// Start a new doodle round with a random word.
    StartDoodleRound {
        /// Games window.
        window_id: WindowId,
    },
    /// Append a stroke segment to the current doodle.
    AddDoodleStroke {
        /// Games window.
        window_id: WindowId,
        /// Segment drawn by the user.
        segment: StrokeSegment,
    },
    /// Erase the current doodle.
    ClearDoodle {
        /// Games window.
        window_id: WindowId,
    },
    /// Submit the current doodle for guessing.
    SubmitDoodleGuess {
        /// Games window.
        window_id: WindowId,
    },
    /// Optimistically append a user message and request a reply.
    BeginChatSend {
        /// Chat window.
        window_id: WindowId,
        /// Contact the thread belongs to.
        contact_id: String,
        /// Message text.
        text: String,
        /// Message time in unix milliseconds.
        now_ms: u64,
    },
    /// Resolve an in-flight chat send with the collaborator outcome.
    CompleteChatSend {
        /// Chat window.
        window_id: WindowId,
        /// Contact the thread belongs to.
        contact_id: String,
        /// Reply or failure from the collaborator.
        outcome: Result<ReplyResponse, ReplyError>,
        /// Reply time in unix milliseconds.
        now_ms: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the effect executor to perform.
pub enum RuntimeEffect {
    /// Write the profile record.
    PersistProfile(UserProfile),
    /// Delete the profile record.
    ClearProfile,
    /// Ask the reply collaborator for the next message of a thread.
    RequestReply {
        /// Chat window that owns the thread.
        window_id: WindowId,
        /// Contact the thread belongs to.
        contact_id: String,
        /// Persona and history to send.
        request: ReplyRequest,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons an action was rejected. A rejected action never changes state.
pub enum ReducerError {
    /// The target window id was not found in the current state.
    #[error("window not found")]
    WindowNotFound,
    /// The configured cap on open windows is reached.
    #[error("window limit of {limit} reached")]
    WindowLimitReached {
        /// Configured cap.
        limit: usize,
    },
    /// The target window hosts a different app.
    #[error("window hosts {actual:?}, expected {expected:?}")]
    WrongAppKind {
        /// Kind the action needs.
        expected: AppKind,
        /// Kind the window actually hosts.
        actual: AppKind,
    },
    /// Onboarding already completed for this session.
    #[error("profile already onboarded")]
    AlreadyOnboarded,
    /// The action needs an onboarded profile.
    #[error("no onboarded profile")]
    NotOnboarded,
    /// Chat text was blank or the thread already has a reply in flight.
    #[error("chat send rejected")]
    SendRejected,
    /// No send is in flight for the thread being completed.
    #[error("no reply pending for thread")]
    NoPendingReply,
    /// The doodle is not in a phase that accepts this action.
    #[error("doodle is not drawing")]
    DoodleNotDrawing,
}

/// Applies a [`DesktopAction`] to the session state and collects resulting side effects.
///
/// This function is the authoritative state transition engine for the session. It performs no
/// I/O; randomness comes from `rng`.
///
/// # Errors
///
/// Returns a [`ReducerError`] describing why the action was rejected. State is unchanged in that
/// case.
pub fn reduce_desktop<R: Rng + ?Sized>(
    state: &mut DesktopState,
    rng: &mut R,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::OpenWindow { app_kind } => {
            if let Some(limit) = state.window_limit {
                if state.windows.len() >= limit {
                    return Err(ReducerError::WindowLimitReached { limit });
                }
            }
            state.windows.open(app_kind);
        }
        DesktopAction::CloseWindow { window_id } => {
            if !state.windows.close(window_id) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::FocusWindow { window_id } => {
            if !state.windows.focus(window_id) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::MoveWindow {
            window_id,
            position,
        } => {
            if !state.windows.move_to(window_id, position) {
                return Err(ReducerError::WindowNotFound);
            }
        }
        DesktopAction::CompleteOnboarding { profile } => {
            if !state.profile.complete_onboarding(profile.clone()) {
                return Err(ReducerError::AlreadyOnboarded);
            }
            effects.push(RuntimeEffect::PersistProfile(profile));
        }
        DesktopAction::SetAvatar { avatar } => {
            let profile = state
                .profile
                .set_avatar(avatar)
                .ok_or(ReducerError::NotOnboarded)?;
            effects.push(RuntimeEffect::PersistProfile(profile.clone()));
        }
        DesktopAction::Logout => {
            state.profile.clear();
            state.windows.close_all();
            state.rps_score = Default::default();
            effects.push(RuntimeEffect::ClearProfile);
        }
        DesktopAction::SelectGame { window_id, game } => {
            games_mut(state, window_id)?.selected = game;
        }
        DesktopAction::PlayRps { window_id, choice } => {
            let DesktopState {
                windows, rps_score, ..
            } = state;
            let games = games_in(windows, window_id)?;
            games.selected = GameKind::RockPaperScissors;
            games.rps.play(choice, rng, rps_score);
        }
        DesktopAction::ResetRps { window_id } => {
            games_mut(state, window_id)?.rps.reset();
        }
        DesktopAction::StartDoodleRound { window_id } => {
            let games = games_mut(state, window_id)?;
            games.selected = GameKind::Doodle;
            games.doodle.start_round(rng);
        }
        DesktopAction::AddDoodleStroke { window_id, segment } => {
            if !games_mut(state, window_id)?.doodle.add_stroke(segment) {
                return Err(ReducerError::DoodleNotDrawing);
            }
        }
        DesktopAction::ClearDoodle { window_id } => {
            games_mut(state, window_id)?.doodle.clear();
        }
        DesktopAction::SubmitDoodleGuess { window_id } => {
            games_mut(state, window_id)?
                .doodle
                .submit_guess()
                .ok_or(ReducerError::DoodleNotDrawing)?;
        }
        DesktopAction::BeginChatSend {
            window_id,
            contact_id,
            text,
            now_ms,
        } => {
            let persona = persona_context(state);
            let request = chat_mut(state, window_id)?
                .begin_send(&contact_id, &text, &persona, now_ms)
                .ok_or(ReducerError::SendRejected)?;
            effects.push(RuntimeEffect::RequestReply {
                window_id,
                contact_id: contact_id.trim().to_string(),
                request,
            });
        }
        DesktopAction::CompleteChatSend {
            window_id,
            contact_id,
            outcome,
            now_ms,
        } => {
            chat_mut(state, window_id)?
                .complete_send(&contact_id, outcome, now_ms)
                .ok_or(ReducerError::NoPendingReply)?;
        }
    }

    Ok(effects)
}

fn persona_context(state: &DesktopState) -> PersonaContext {
    let profile = state.profile.get();
    PersonaContext {
        user_name: profile.map(|p| p.name().to_string()),
        timezone: profile.map(|p| p.timezone().to_string()),
    }
}

fn app_state_in(
    windows: &mut WindowManager,
    window_id: WindowId,
) -> Result<&mut AppState, ReducerError> {
    windows
        .app_state_mut(window_id)
        .ok_or(ReducerError::WindowNotFound)
}

fn games_in(
    windows: &mut WindowManager,
    window_id: WindowId,
) -> Result<&mut GamesState, ReducerError> {
    match app_state_in(windows, window_id)? {
        AppState::Games(games) => Ok(games),
        other => Err(ReducerError::WrongAppKind {
            expected: AppKind::Games,
            actual: other.app_kind(),
        }),
    }
}

fn games_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut GamesState, ReducerError> {
    games_in(&mut state.windows, window_id)
}

fn chat_mut(
    state: &mut DesktopState,
    window_id: WindowId,
) -> Result<&mut ChatState, ReducerError> {
    match app_state_in(&mut state.windows, window_id)? {
        AppState::Chat(chat) => Ok(chat),
        other => Err(ReducerError::WrongAppKind {
            expected: AppKind::Chat,
            actual: other.app_kind(),
        }),
    }
}
