use serde::{Deserialize, Deserializer, Serialize};

use crate::food::Difficulty;

mod store;
pub use store::{Error, JsonFile, LeaderboardStore, STORE_FILE_NAME};

#[cfg(test)]
pub use store::Memory;

/// Entries kept after every insertion.
pub const CAPACITY: usize = 10;

pub const ANONYMOUS_NAME: &str = "Anonymous gourmet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub difficulty: Difficulty,
    pub date: String,
}

impl LeaderboardEntry {
    /// An entry dated today; a blank `name` becomes [`ANONYMOUS_NAME`].
    pub fn today(name: &str, score: u32, difficulty: Difficulty) -> Self {
        let name = name.trim();

        Self {
            name: if name.is_empty() {
                ANONYMOUS_NAME.to_owned()
            } else {
                name.to_owned()
            },
            score,
            difficulty,
            date: today(),
        }
    }
}

pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Top scores, highest first; equal scores keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Leaderboard(Vec<LeaderboardEntry>);

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: LeaderboardEntry) {
        self.0.push(entry);
        self.rank();
    }

    fn rank(&mut self) {
        // sort_by is stable, so ties stay in insertion order
        self.0.sort_by(|a, b| b.score.cmp(&a.score));
        self.0.truncate(CAPACITY);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LeaderboardEntry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

/// Hand-edited or older files are re-ranked and capped on the way in.
impl<'de> Deserialize<'de> for Leaderboard {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut leaderboard = Self(Vec::deserialize(deserializer)?);
        leaderboard.rank();
        Ok(leaderboard)
    }
}
