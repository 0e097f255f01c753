use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::language::Language;
use crate::preferences::DEFAULT_TASK_LIST;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    /// Root holding `task-lists/` and `locales/`.
    pub dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file backing the key-value store.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    pub language: String,
    pub task_list: String,
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (NOWRUZ__STORAGE__PATH, etc.)
    /// 2. Config file given by path, NOWRUZ_CONFIG, or config/nowruz.toml
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder()
            .set_default("data.dir", "data/translations")?
            .set_default("storage.path", "nowruz-state.json")?
            .set_default("logging.level", default_log_level())?
            .set_default("defaults.language", Language::default().code())?
            .set_default("defaults.task_list", DEFAULT_TASK_LIST)?;

        let config_file_path = config_path
            .or_else(|| env::var("NOWRUZ_CONFIG").ok())
            .unwrap_or_else(|| "config/nowruz.toml".to_string());

        // optional; a missing file just leaves the defaults
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("NOWRUZ")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn default_language(&self) -> Result<Language, String> {
        self.defaults
            .language
            .parse()
            .map_err(|e| format!("defaults.language: {e}"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.default_language()?;
        if self.defaults.task_list.trim().is_empty() {
            return Err("defaults.task_list must not be empty".to_string());
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err("storage.path must not be empty".to_string());
        }
        Ok(())
    }
}
