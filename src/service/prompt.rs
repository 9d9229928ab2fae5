//! Prompt text and response schemas sent to the generative model.

use rand::{seq::SliceRandom, Rng};
use serde_json::{json, Value};

use crate::food::Difficulty;

const FLAVORS: [&str; 9] = [
    "spicy",
    "sweet",
    "savory",
    "mild",
    "exotic",
    "traditional",
    "crispy",
    "tender",
    "rich",
];

const PLATING_STYLES: [&str; 4] = [
    "high-end restaurant plating",
    "street food style",
    "home-cooked meal vibe",
    "food magazine editorial shot",
];

const LIGHTINGS: [&str; 4] = [
    "natural sunlight",
    "warm candle light",
    "bright studio lighting",
    "moody dim lighting",
];

fn pick<'a>(rng: &mut impl Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or_default()
}

pub const fn difficulty_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => {
            "Pick a dish that is known all over the world, one anybody recognises by name. \
             The hint must be very direct and easy."
        }
        Difficulty::Medium => {
            "Pick a reasonably popular dish that still carries a distinct national character. \
             The hint should be moderately inferable."
        }
        Difficulty::Hard => {
            "Pick a rare or very specific regional dish that only a gourmet would know. \
             The hint must be tricky and creative."
        }
    }
}

pub fn exclusion_clause(exclude: &[String]) -> Option<String> {
    if exclude.is_empty() {
        None
    } else {
        Some(format!(
            "IMPORTANT: ABSOLUTELY DO NOT pick any of these foods: {}.",
            exclude.join(", ")
        ))
    }
}

pub fn generate_food(
    rng: &mut impl Rng,
    category: &str,
    difficulty: Difficulty,
    exclude: &[String],
) -> String {
    let flavor = pick(rng, &FLAVORS);
    let exclusion = exclusion_clause(exclude).unwrap_or_default();

    format!(
        "You are the world's finest food curator. Choose one {flavor} dish from the {category} category.
Difficulty: {difficulty}.
Instructions: {instruction}
{exclusion}

Reply with JSON in exactly this shape:
{{
  \"name\": \"the dish's name\",
  \"description\": \"one mouth-watering sentence about its taste and character\",
  \"hint\": \"a decisive hint that never mentions the name\"
}}",
        instruction = difficulty_instruction(difficulty),
    )
}

pub fn food_image(rng: &mut impl Rng, name: &str) -> String {
    let style = pick(rng, &PLATING_STYLES);
    let lighting = pick(rng, &LIGHTINGS);

    format!(
        "A stunning, high-quality professional food photograph of {name}. {style}, {lighting}. \
         Macro shot, appetizing texture, vibrant colors, shallow depth of field. 8k resolution."
    )
}

pub fn verify_answer(target: &str, answer: &str) -> String {
    format!(
        "Answer: \"{target}\", player input: \"{answer}\".
Decide whether the player's input means the same dish as the answer or is very close to it. \
Ignore small spelling mistakes.
{{
  \"isCorrect\": true/false,
  \"feedback\": \"short, friendly feedback\"
}}"
    )
}

pub fn food_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "description": { "type": "STRING" },
            "hint": { "type": "STRING" }
        },
        "required": ["name", "description", "hint"]
    })
}

pub fn verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "isCorrect": { "type": "BOOLEAN" },
            "feedback": { "type": "STRING" }
        },
        "required": ["isCorrect", "feedback"]
    })
}
