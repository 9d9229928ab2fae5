use std::fmt;

mod controller;
pub use controller::{Advance, GuessOutcome, RoundController};

mod error;
pub use error::{Error, InvalidTransitionError};

mod prefetch;
pub use prefetch::Prefetcher;

mod session;
pub use session::{ExclusionHistory, Session};

/// Rounds in a game unless configured otherwise.
pub const TOTAL_ROUNDS: u32 = 10;

/// Shown when the judge itself could not be reached.
pub const VERIFY_FAILED_FEEDBACK: &str = "Something went wrong while grading your answer.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Idle,
    Loading,
    Playing,
    Result,
    Finished,
    Ranking,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Result => "showing a result",
            Self::Finished => "finished",
            Self::Ranking => "showing the ranking",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Legendary,
    Connoisseur,
    KeepTasting,
}

impl Rating {
    pub const fn new(score: u32, total_rounds: u32) -> Self {
        if score >= total_rounds {
            Self::Legendary
        } else if score * 10 >= total_rounds * 7 {
            Self::Connoisseur
        } else {
            Self::KeepTasting
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Legendary => "👑 A legendary god of gastronomy!",
            Self::Connoisseur => "👨‍🍳 You have a superb knowledge of food.",
            Self::KeepTasting => "🍙 Shall we go taste some more of the world?",
        }
    }
}
