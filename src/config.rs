use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::{CivicError, Result};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    pub default_language: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).map_err(|e| CivicError::ConfigRead {
                path: config_path.clone(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| CivicError::ConfigParse {
            path: config_path,
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "civic")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(CivicError::NoConfigDir)
    }

    /// Get API base URL with env var taking precedence over config file.
    pub fn api_url(&self) -> String {
        if let Ok(url) = std::env::var("CIVIC_API_URL") {
            return url;
        }

        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }
}
