use serde::de::DeserializeOwned;
use thisslime::TracingError;
use tracing::{debug, instrument, warn};

use super::{
    error::{ClientError, EmptyResponseError},
    prompt, Error, FoodService, Result,
};
use crate::{
    food::{Difficulty, FoodItem, QuizResult},
    framework::config::{ApiKey, ServiceConfig},
};

mod wire;
use wire::{GenerateContentRequest, GenerateContentResponse};

/// [`FoodService`] backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct Gemini {
    client: reqwest::Client,
    base_url: url::Url,
    api_key: Option<ApiKey>,
    text_model: String,
    image_model: Option<String>,
}

impl Gemini {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.images.then(|| config.image_model.clone()),
        })
    }

    fn endpoint(&self, model: &str) -> Result<url::Url> {
        Ok(self
            .base_url
            .join(&format!("v1beta/models/{model}:generateContent"))?)
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| Error::unavailable("no api key configured"))?;

        let response = self
            .client
            .post(self.endpoint(model)?)
            .header("x-goog-api-key", api_key.expose())
            .json(request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ClientError::or_server)?;

        debug!(model, code = %response.status());

        let body = response.text().await.map_err(ClientError::or_server)?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: serde_json::Value,
    ) -> Result<T> {
        let request = GenerateContentRequest::text(prompt).json_schema(schema);
        let response = self.generate_content(&self.text_model, &request).await?;

        let text = response.first_text().ok_or_else(|| EmptyResponseError {
            model: self.text_model.clone(),
            expected: "text",
        })?;

        Ok(serde_json::from_str(text)?)
    }

    async fn generate_image(&self, model: &str, name: &str) -> Result<url::Url> {
        let prompt = {
            let mut rng = rand::thread_rng();
            prompt::food_image(&mut rng, name)
        };

        let request = GenerateContentRequest::text(&prompt).square_image();
        let response = self.generate_content(model, &request).await?;

        let image = response
            .first_inline_data()
            .ok_or_else(|| EmptyResponseError {
                model: model.to_owned(),
                expected: "image",
            })?;

        Ok(image.data_url()?)
    }
}

impl FoodService for Gemini {
    #[instrument(skip(self, exclude), fields(excluded = exclude.len()))]
    async fn generate_food_item(
        &self,
        category: &str,
        difficulty: Difficulty,
        exclude: &[String],
    ) -> Result<FoodItem> {
        let prompt = {
            let mut rng = rand::thread_rng();
            prompt::generate_food(&mut rng, category, difficulty, exclude)
        };

        let food: FoodItem = self.generate_json(&prompt, prompt::food_schema()).await?;

        if food.name().trim().is_empty() {
            return Err(EmptyResponseError {
                model: self.text_model.clone(),
                expected: "name",
            }
            .into());
        }

        debug!(name = food.name(), "food generated");

        let Some(ref model) = self.image_model else {
            return Ok(food);
        };

        match self.generate_image(model, food.name()).await {
            Ok(image) => Ok(food.with_image(image)),
            Err(err) => {
                err.trace();
                warn!(name = food.name(), "image generation failed, continuing without one");
                Ok(food)
            }
        }
    }

    #[instrument(skip(self))]
    async fn verify_answer(&self, target: &str, answer: &str) -> Result<QuizResult> {
        let prompt = prompt::verify_answer(target, answer);
        let result: QuizResult = self.generate_json(&prompt, prompt::verdict_schema()).await?;

        debug!(correct = result.is_correct());
        Ok(result)
    }
}
