use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

pub const DOODLE_WORDS: [&str; 10] = [
    "cat", "house", "tree", "sun", "car", "fish", "flower", "star", "boat", "apple",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoodlePhase {
    #[default]
    Idle,
    Drawing,
    Guessing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// One straight line of the drawing. The stroke log is the durable record of the doodle; any
/// pixel buffer is derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeSegment {
    pub start: Point,
    pub end: Point,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResult {
    pub success: bool,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoodleState {
    phase: DoodlePhase,
    target_word: String,
    strokes: Vec<StrokeSegment>,
    guess_result: Option<GuessResult>,
}

impl DoodleState {
    pub fn phase(&self) -> DoodlePhase {
        self.phase
    }

    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    pub fn strokes(&self) -> &[StrokeSegment] {
        &self.strokes
    }

    pub fn guess_result(&self) -> Option<&GuessResult> {
        self.guess_result.as_ref()
    }

    /// Picks a new target word and starts drawing. Allowed from any phase.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &str {
        let word = DOODLE_WORDS.choose(rng).copied().unwrap_or(DOODLE_WORDS[0]);
        self.begin_with_word(word);
        &self.target_word
    }

    pub(crate) fn begin_with_word(&mut self, word: &str) {
        self.target_word = word.to_string();
        self.strokes.clear();
        self.guess_result = None;
        self.phase = DoodlePhase::Drawing;
    }

    /// Appends a segment. Returns `false` (and records nothing) outside [`DoodlePhase::Drawing`].
    pub fn add_stroke(&mut self, segment: StrokeSegment) -> bool {
        if self.phase != DoodlePhase::Drawing {
            return false;
        }
        self.strokes.push(segment);
        true
    }

    /// Empties the stroke log; word and phase are unchanged.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Submits the drawing for guessing.
    ///
    /// No recognition runs: every submitted drawing is "guessed" correctly, including an empty
    /// one. Returns `None` when no round is being drawn.
    pub fn submit_guess(&mut self) -> Option<GuessResult> {
        if self.phase != DoodlePhase::Drawing {
            return None;
        }
        self.phase = DoodlePhase::Guessing;
        let result = GuessResult {
            success: true,
            message: format!("I think it's a {}!", self.target_word),
        };
        self.guess_result = Some(result.clone());
        self.phase = DoodlePhase::Idle;
        Some(result)
    }
}
