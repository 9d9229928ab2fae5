use std::{fmt, str::FromStr};

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Deserializer, Serialize};

/// The fixed pool every generation request draws its category from.
pub const CATEGORIES: [&str; 16] = [
    "Korean",
    "Japanese",
    "Italian",
    "Mexican",
    "French",
    "Chinese",
    "Indian",
    "Thai",
    "American",
    "Spanish",
    "Street Food",
    "Desserts",
    "Breakfast",
    "Turkish",
    "Greek",
    "Vietnamese",
];

/// Uniform pick over [`CATEGORIES`], independent per call.
pub fn random_category(rng: &mut impl Rng) -> &'static str {
    CATEGORIES
        .choose(rng)
        .copied()
        .unwrap_or(CATEGORIES[0])
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a difficulty - expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDifficultyError(trimmed.to_owned()))
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// A dish picked by the generative service for one round.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FoodItem {
    name: String,
    description: String,
    hint: String,

    #[serde(skip)]
    image: Option<url::Url>,
}

impl FoodItem {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            hint: hint.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: url::Url) -> Self {
        self.image = Some(image);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// A `data:image/png;base64,...` url, when an image was generated.
    pub fn image(&self) -> Option<&url::Url> {
        self.image.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizResult {
    #[serde(rename = "isCorrect")]
    is_correct: bool,
    feedback: String,
}

impl QuizResult {
    pub fn new(is_correct: bool, feedback: impl Into<String>) -> Self {
        Self {
            is_correct,
            feedback: feedback.into(),
        }
    }

    pub const fn is_correct(&self) -> bool {
        self.is_correct
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }
}
