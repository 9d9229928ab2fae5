use std::{fmt, time::Duration};

use serde::Deserialize;
use tracing::{debug, warn};

const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub api_key: Option<ApiKey>,
    pub base_url: url::Url,
    pub text_model: String,
    pub image_model: String,
    pub images: bool,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            #[allow(clippy::unwrap_used)]
            base_url: url::Url::parse("https://generativelanguage.googleapis.com/").unwrap(),
            text_model: "gemini-3-flash-preview".to_owned(),
            image_model: "gemini-2.5-flash-image".to_owned(),
            images: true,
            timeout_secs: 60,
        }
    }
}

impl ServiceConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub(super) fn api_key_from_env(&mut self) {
        if self.api_key.is_some() {
            return;
        }

        if let Ok(key) = std::env::var(API_KEY_VAR) {
            debug!(var = API_KEY_VAR, "using api key from environment");
            self.api_key = Some(ApiKey(key));
        } else {
            warn!("no api key in config or environment - games can't be played");
        }
    }
}

#[derive(Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
