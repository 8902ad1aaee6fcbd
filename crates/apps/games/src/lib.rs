//! Mini-game state machines hosted by the desktop "Mini Games" window.
//!
//! Both games are plain state types with no UI or I/O. Randomness is injected through
//! [`rand::Rng`] so callers can seed it.

mod doodle;
mod rps;

pub use doodle::{DoodlePhase, DoodleState, GuessResult, Point, StrokeSegment, DOODLE_WORDS};
pub use rps::{resolve, RpsChoice, RpsOutcome, RpsRound, RpsScore, RpsState};

use serde::{Deserialize, Serialize};

/// Game currently shown in a games window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameKind {
    #[default]
    RockPaperScissors,
    Doodle,
}

/// Per-window state of the games app: one instance of each game plus the selected tab.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GamesState {
    pub selected: GameKind,
    pub rps: RpsState,
    pub doodle: DoodleState,
}
