pub mod config;
pub use config::AppConfig as Config;

pub mod logging;
