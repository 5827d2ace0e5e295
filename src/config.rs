use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{FeedError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Environment variable consulted when no key is given directly.
    pub api_key_env: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Fraction of the trailing marker that must be on screen to load more.
    pub sentinel_threshold: f64,
    pub marker_rows: u16,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            sentinel_threshold: 1.0,
            marker_rows: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("marquee").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location. Missing or unreadable
    /// files fall back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Config::default()
            }
        }
    }

    /// Flag value first, then the config file, then the environment.
    pub fn resolve_api_key(&self, flag: Option<String>) -> Result<String> {
        flag.filter(|k| !k.is_empty())
            .or_else(|| self.api.api_key.clone().filter(|k| !k.is_empty()))
            .or_else(|| {
                std::env::var(&self.api.api_key_env)
                    .ok()
                    .filter(|k| !k.is_empty())
            })
            .ok_or_else(|| {
                FeedError::Config(format!(
                    "no API key: pass --api-key, set api.api_key, or export {}",
                    self.api.api_key_env
                ))
            })
    }
}
