//! Scripted in-process [`FoodService`] that records every call.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Mutex,
};

use super::{Error, FoodService, Result};
use crate::food::{Difficulty, FoodItem, QuizResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCall {
    pub category: String,
    pub difficulty: Difficulty,
    pub exclude: Vec<String>,
}

/// Generation call `n` returns `food-n` unless `n` was scripted to fail or
/// to return another name.
/// Delayed generations yield to the runtime before answering.
/// Verification pops a scripted verdict, else compares names case-insensitively.
#[derive(Debug, Default)]
pub struct MockService {
    generate_calls: Mutex<Vec<GenerateCall>>,
    verify_calls: Mutex<Vec<(String, String)>>,
    failing_generations: Mutex<HashSet<usize>>,
    renamed_generations: Mutex<HashMap<usize, String>>,
    delayed_generations: Mutex<HashMap<usize, usize>>,
    verdicts: Mutex<VecDeque<Option<bool>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn food_name(index: usize) -> String {
        format!("food-{index}")
    }

    pub fn fail_generation(self, index: usize) -> Self {
        self.failing_generations
            .lock()
            .expect("mock lock poisoned")
            .insert(index);
        self
    }

    pub fn rename_generation(self, index: usize, name: &str) -> Self {
        self.renamed_generations
            .lock()
            .expect("mock lock poisoned")
            .insert(index, name.to_owned());
        self
    }

    /// Makes generation `index` yield `yields` times before answering, so
    /// spawned work gets to run while it is outstanding.
    pub fn delay_generation(self, index: usize, yields: usize) -> Self {
        self.delayed_generations
            .lock()
            .expect("mock lock poisoned")
            .insert(index, yields);
        self
    }

    /// Queues the next verdicts; `None` makes that verification call error.
    pub fn verdicts(self, verdicts: impl IntoIterator<Item = Option<bool>>) -> Self {
        self.verdicts
            .lock()
            .expect("mock lock poisoned")
            .extend(verdicts);
        self
    }

    pub fn generate_calls(&self) -> Vec<GenerateCall> {
        self.generate_calls
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }

    pub fn generate_count(&self) -> usize {
        self.generate_calls.lock().expect("mock lock poisoned").len()
    }

    pub fn verify_calls(&self) -> Vec<(String, String)> {
        self.verify_calls
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }
}

impl FoodService for MockService {
    async fn generate_food_item(
        &self,
        category: &str,
        difficulty: Difficulty,
        exclude: &[String],
    ) -> Result<FoodItem> {
        let index = {
            let mut calls = self.generate_calls.lock().expect("mock lock poisoned");
            calls.push(GenerateCall {
                category: category.to_owned(),
                difficulty,
                exclude: exclude.to_vec(),
            });
            calls.len() - 1
        };

        let yields = self
            .delayed_generations
            .lock()
            .expect("mock lock poisoned")
            .get(&index)
            .copied()
            .unwrap_or_default();

        for _ in 0..yields {
            tokio::task::yield_now().await;
        }

        let fails = self
            .failing_generations
            .lock()
            .expect("mock lock poisoned")
            .contains(&index);

        if fails {
            Err(Error::unavailable(format!("generation {index} scripted to fail")))
        } else {
            let name = self
                .renamed_generations
                .lock()
                .expect("mock lock poisoned")
                .get(&index)
                .cloned()
                .unwrap_or_else(|| Self::food_name(index));

            Ok(FoodItem::new(
                name.clone(),
                format!("description of {name}"),
                format!("hint for {name}"),
            ))
        }
    }

    async fn verify_answer(&self, target: &str, answer: &str) -> Result<QuizResult> {
        self.verify_calls
            .lock()
            .expect("mock lock poisoned")
            .push((target.to_owned(), answer.to_owned()));

        let scripted = self.verdicts.lock().expect("mock lock poisoned").pop_front();

        match scripted {
            Some(Some(correct)) => Ok(QuizResult::new(correct, "scripted")),
            Some(None) => Err(Error::unavailable("verification scripted to fail")),
            None => {
                let correct = target.eq_ignore_ascii_case(answer.trim());
                Ok(QuizResult::new(correct, if correct { "yum" } else { "nope" }))
            }
        }
    }
}
