use serde::Deserialize;
use std::path::PathBuf;

use crate::infrastructure::news_parser::DEFAULT_SOURCE;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub news: NewsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_directory")]
    pub directory: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NewsSettings {
    #[serde(default = "default_news_source")]
    pub default_source: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_storage_directory() -> PathBuf {
    PathBuf::from("data")
}

fn default_news_source() -> String {
    DEFAULT_SOURCE.to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            directory: default_storage_directory(),
        }
    }
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            default_source: default_news_source(),
        }
    }
}

/// Load `config/dashboard.{toml,...}` if present, then `DASHBOARD__SECTION__KEY` overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
