//! Configuration and shared utilities.

mod config;

pub use config::{
    load_config, Config, ConfigError, DataSettings, LlmSettings, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
