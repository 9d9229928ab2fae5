use std::future::Future;

use crate::food::{Difficulty, FoodItem, QuizResult};

mod error;
pub use error::Error;

pub mod gemini;
pub use gemini::Gemini;

pub mod prompt;

#[cfg(test)]
pub mod mock;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The generative backend the game delegates food selection and answer
/// judging to.
///
/// Both calls are fallible and never retried; callers decide what a failure
/// means for the session.
pub trait FoodService: Send + Sync + 'static {
    /// Picks a dish from `category` at `difficulty`, avoiding every name in
    /// `exclude`.
    fn generate_food_item(
        &self,
        category: &str,
        difficulty: Difficulty,
        exclude: &[String],
    ) -> impl Future<Output = Result<FoodItem>> + Send;

    /// Judges whether `answer` names `target`, tolerating small spelling
    /// differences.
    fn verify_answer(
        &self,
        target: &str,
        answer: &str,
    ) -> impl Future<Output = Result<QuizResult>> + Send;
}
