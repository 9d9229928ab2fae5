use crate::food::{Difficulty, FoodItem};

/// Names already played this session, oldest first. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionHistory(Vec<String>);

impl ExclusionHistory {
    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.0.iter().any(|used| used.trim().eq_ignore_ascii_case(name))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The names a request must avoid, plus `extra` when it isn't recorded yet.
    pub fn excluding(&self, extra: Option<&str>) -> Vec<String> {
        let mut names = self.0.clone();

        if let Some(extra) = extra {
            if !self.contains(extra) {
                names.push(extra.to_owned());
            }
        }

        names
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    difficulty: Difficulty,
    round: u32,
    score: u32,
    current: Option<FoodItem>,
    first_attempt: bool,
    hint_visible: bool,
    history: ExclusionHistory,
}

impl Session {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            round: 1,
            score: 0,
            current: None,
            first_attempt: true,
            hint_visible: false,
            history: ExclusionHistory::default(),
        }
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn round(&self) -> u32 {
        self.round
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn current(&self) -> Option<&FoodItem> {
        self.current.as_ref()
    }

    pub const fn is_first_attempt(&self) -> bool {
        self.first_attempt
    }

    pub const fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub const fn history(&self) -> &ExclusionHistory {
        &self.history
    }

    /// Clears the per-round flags before a new dish is loaded.
    pub(super) fn begin_round(&mut self) {
        self.current = None;
        self.first_attempt = true;
        self.hint_visible = false;
    }

    pub(super) fn serve(&mut self, food: FoodItem) {
        self.history.push(food.name());
        self.current = Some(food);
    }

    pub(super) fn reveal_hint(&mut self) {
        self.first_attempt = false;
        self.hint_visible = true;
    }

    pub(super) fn award_point(&mut self) {
        self.score += 1;
    }

    pub(super) fn next_round(&mut self) {
        self.round += 1;
    }
}
