use std::path::{Path, PathBuf};

use config::{builder::DefaultState, ConfigBuilder, FileFormat};
use rand::seq::IteratorRandom;
use serde::Deserialize;
use thisslime::TracingError;
use tracing::{info, warn};

use crate::food::Difficulty;

mod service;
pub use service::{ApiKey, ServiceConfig};

const CONFIG_PATH_VAR: &str = "GOURMET_QUEST_TOML";
const DEFAULT_CONFIG_PATH: &str = "./gourmet-quest.toml";
const ENV_PREFIX: &str = "GOURMET_QUEST";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

impl AppConfig {
    /// Reads the toml file (`path`, else `$GOURMET_QUEST_TOML`, else
    /// `./gourmet-quest.toml`) layered under `GOURMET_QUEST__*` variables.
    #[tracing::instrument(skip_all, name = "config")]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let path = path.map_or_else(Self::default_path, Path::to_owned);
        info!(path = %path.display(), "looking for config file...");

        let builder = ::config::Config::builder()
            .add_source(
                ::config::File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        let mut config = Self::from_builder(builder)?;
        config.service.api_key_from_env();

        info!("config loaded");
        Ok(config)
    }

    fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            PathBuf::from(path)
        } else {
            warn!(
                path = DEFAULT_CONFIG_PATH,
                "{CONFIG_PATH_VAR} env unset, using default path"
            );
            PathBuf::from(DEFAULT_CONFIG_PATH)
        }
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, Error> {
        let config: Self = builder
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), InvalidValueError> {
        if self.game.total_rounds == 0 {
            return Err(InvalidValueError {
                key: "game.total_rounds",
                message: "a game needs at least one round",
            });
        }

        if self.service.timeout_secs == 0 {
            return Err(InvalidValueError {
                key: "service.timeout_secs",
                message: "timeout must be at least one second",
            });
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, TracingError)]
pub enum Error {
    #[error("file read error: {0}")]
    #[event(level = ERROR)]
    Read(config::ConfigError),

    #[error("parsing error: {0}")]
    #[event(level = ERROR)]
    Parse(config::ConfigError),

    #[error(transparent)]
    Invalid(#[from] InvalidValueError),
}

#[derive(Debug, thiserror::Error, TracingError)]
#[error("invalid value for '{key}': {message}")]
#[event(level = ERROR)]
pub struct InvalidValueError {
    #[field(print = Display)]
    key: &'static str,

    #[field(print = Display)]
    message: &'static str,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GameConfig {
    pub total_rounds: u32,
    pub difficulty: Difficulty,
    pub nickname: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: crate::game::TOTAL_ROUNDS,
            difficulty: Difficulty::default(),
            nickname: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub data_dir: PathBuf,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
        }
    }
}

impl LeaderboardConfig {
    pub fn file(&self) -> PathBuf {
        self.data_dir.join(crate::leaderboard::STORE_FILE_NAME)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct FrontendConfig {
    pub images_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LogsConfig {
    flavor_texts: Vec<String>,
}

impl LogsConfig {
    pub fn flavor_text(&self) -> Option<&str> {
        self.flavor_texts
            .iter()
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Error};
    use crate::food::Difficulty;
    use config::FileFormat;
    use pretty_assertions::assert_eq;

    fn from_toml(toml: &str) -> Result<AppConfig, Error> {
        AppConfig::from_builder(
            ::config::Config::builder().add_source(::config::File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = from_toml("").expect("defaults are valid");

        assert_eq!(config.game.total_rounds, 10);
        assert_eq!(config.game.difficulty, Difficulty::Medium);
        assert_eq!(config.service.text_model, "gemini-3-flash-preview");
        assert_eq!(config.service.image_model, "gemini-2.5-flash-image");
        assert!(config.service.images);
        assert!(config.service.api_key.is_none());
        assert_eq!(
            config.leaderboard.file(),
            std::path::Path::new(".").join("gourmet_leaderboard.json")
        );
        assert_eq!(config.logs.flavor_text(), None);
    }

    #[test]
    fn sections_override_defaults() {
        let config = from_toml(
            r#"
            [service]
            api_key = "secret"
            images = false

            [game]
            total_rounds = 3
            difficulty = "hard"
            nickname = "chef"

            [logs]
            flavor_texts = ["bon appetit"]
            "#,
        )
        .expect("hard-coded config is valid");

        assert_eq!(config.game.total_rounds, 3);
        assert_eq!(config.game.difficulty, Difficulty::Hard);
        assert_eq!(config.game.nickname.as_deref(), Some("chef"));
        assert!(!config.service.images);
        assert_eq!(
            config.service.api_key.as_ref().map(|key| key.expose()),
            Some("secret")
        );
        assert_eq!(config.logs.flavor_text(), Some("bon appetit"));
    }

    #[test]
    fn zero_rounds_is_rejected() {
        let result = from_toml("[game]\ntotal_rounds = 0");
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn api_key_is_redacted() {
        let config = from_toml("[service]\napi_key = \"secret\"").expect("hard-coded");
        let printed = format!("{config:?}");

        assert!(!printed.contains("secret"));
    }
}
