use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    pub const ALL: [RpsChoice; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    /// The choice this one defeats.
    pub fn beats(self) -> RpsChoice {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }
}

/// Outcome from the user's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RpsOutcome {
    Win,
    Lose,
    Tie,
}

impl RpsOutcome {
    pub fn between(user: RpsChoice, ai: RpsChoice) -> Self {
        if user == ai {
            Self::Tie
        } else if user.beats() == ai {
            Self::Win
        } else {
            Self::Lose
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsRound {
    pub user_choice: RpsChoice,
    pub ai_choice: RpsChoice,
    pub outcome: RpsOutcome,
}

impl RpsRound {
    pub fn new(user_choice: RpsChoice, ai_choice: RpsChoice) -> Self {
        Self {
            user_choice,
            ai_choice,
            outcome: RpsOutcome::between(user_choice, ai_choice),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsScore {
    pub user: u32,
    pub ai: u32,
}

impl RpsScore {
    pub fn record(&mut self, outcome: RpsOutcome) {
        match outcome {
            RpsOutcome::Win => self.user = self.user.saturating_add(1),
            RpsOutcome::Lose => self.ai = self.ai.saturating_add(1),
            RpsOutcome::Tie => {}
        }
    }
}

/// Draws the opponent's move uniformly and scores it against `user_choice`.
///
/// The opponent keeps no memory between rounds.
pub fn resolve<R: Rng + ?Sized>(user_choice: RpsChoice, rng: &mut R) -> RpsRound {
    let ai_choice = *RpsChoice::ALL
        .choose(rng)
        .unwrap_or(&RpsChoice::Rock);
    RpsRound::new(user_choice, ai_choice)
}

/// Per-window RPS state. The cumulative score is owned by whoever hosts the window so that it can
/// outlive a single window instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsState {
    last_result: Option<RpsRound>,
}

impl RpsState {
    pub fn last_result(&self) -> Option<&RpsRound> {
        self.last_result.as_ref()
    }

    /// Records a resolved round and applies it to `score`.
    pub fn apply(&mut self, round: RpsRound, score: &mut RpsScore) {
        score.record(round.outcome);
        self.last_result = Some(round);
    }

    pub fn play<R: Rng + ?Sized>(
        &mut self,
        user_choice: RpsChoice,
        rng: &mut R,
        score: &mut RpsScore,
    ) -> RpsRound {
        let round = resolve(user_choice, rng);
        self.apply(round, score);
        round
    }

    /// Clears the last result. The score is left untouched.
    pub fn reset(&mut self) {
        self.last_result = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn outcome_table_matches_beats_relation() {
        use RpsChoice::*;
        use RpsOutcome::*;
        let table = [
            (Rock, Rock, Tie),
            (Rock, Paper, Lose),
            (Rock, Scissors, Win),
            (Paper, Rock, Win),
            (Paper, Paper, Tie),
            (Paper, Scissors, Lose),
            (Scissors, Rock, Lose),
            (Scissors, Paper, Win),
            (Scissors, Scissors, Tie),
        ];
        for (user, ai, expected) in table {
            assert_eq!(RpsOutcome::between(user, ai), expected, "{user:?} vs {ai:?}");
        }
    }

    #[test]
    fn forced_sequence_scores_two_wins_and_a_tie() {
        let mut state = RpsState::default();
        let mut score = RpsScore::default();
        let plays = [
            (RpsChoice::Rock, RpsChoice::Scissors),
            (RpsChoice::Rock, RpsChoice::Rock),
            (RpsChoice::Paper, RpsChoice::Rock),
        ];

        let outcomes: Vec<_> = plays
            .into_iter()
            .map(|(user, ai)| {
                let round = RpsRound::new(user, ai);
                state.apply(round, &mut score);
                round.outcome
            })
            .collect();

        assert_eq!(
            outcomes,
            vec![RpsOutcome::Win, RpsOutcome::Tie, RpsOutcome::Win]
        );
        assert_eq!(score, RpsScore { user: 2, ai: 0 });
        assert_eq!(
            state.last_result().map(|round| round.ai_choice),
            Some(RpsChoice::Rock)
        );
    }

    #[test]
    fn random_rounds_keep_score_in_step_with_outcomes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = RpsState::default();
        let mut score = RpsScore::default();
        let mut expected = RpsScore::default();
        let mut seen_ai = std::collections::HashSet::new();

        for i in 0..300 {
            let user = RpsChoice::ALL[i % 3];
            let round = state.play(user, &mut rng, &mut score);
            assert_eq!(round.outcome, RpsOutcome::between(user, round.ai_choice));
            expected.record(round.outcome);
            seen_ai.insert(round.ai_choice);
        }

        assert_eq!(score, expected);
        assert_eq!(seen_ai.len(), 3, "opponent should use every move");
    }

    #[test]
    fn reset_clears_last_result_but_not_score() {
        let mut state = RpsState::default();
        let mut score = RpsScore::default();
        state.apply(RpsRound::new(RpsChoice::Paper, RpsChoice::Scissors), &mut score);

        state.reset();

        assert_eq!(state.last_result(), None);
        assert_eq!(score, RpsScore { user: 0, ai: 1 });
    }
}
