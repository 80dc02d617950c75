use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChatError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL_ENV: &str = "PARLEY_MODEL";
pub const BASE_URL_ENV: &str = "PARLEY_BASE_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path).map_err(|e| ChatError::ConfigInvalid {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| ChatError::ConfigInvalid {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;
        Ok(config)
    }

    /// Environment variables win over the file.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(API_KEY_ENV) {
            self.openai_api_key = Some(key);
        }
        if let Some(model) = non_blank(MODEL_ENV) {
            self.model = Some(model);
        }
        if let Some(url) = non_blank(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
        self
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ChatError::ConfigMissing(format!(
                    "no API key found; set {} or add openai_api_key to the config file",
                    API_KEY_ENV
                ))
            })
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn get_config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.json"))
    }
}

/// `<platform config dir>/parley`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| ChatError::ConfigMissing("could not determine config directory".to_string()))?;

    Ok(base.join("parley"))
}
