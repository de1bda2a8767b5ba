use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::quiz::question::Difficulty;
use crate::source::opentdb::DEFAULT_API_URL;

/// The provider rejects requests for more than 50 questions.
pub const MAX_QUESTION_COUNT: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_network_enabled")]
    pub network_enabled: bool,
}

fn default_question_count() -> usize {
    10
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_network_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            question_count: default_question_count(),
            theme: default_theme(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            network_enabled: default_network_enabled(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Missing file yields defaults; an unreadable or unparseable one is an
    /// error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizr")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Clamp numeric fields and reset values that no longer resolve.
    pub fn validate(&mut self, valid_themes: &[String]) {
        self.question_count = self.question_count.clamp(1, MAX_QUESTION_COUNT);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 120);
        if self.api_url.trim().is_empty() {
            self.api_url = default_api_url();
        }
        if !valid_themes.is_empty() && !valid_themes.contains(&self.theme) {
            self.theme = default_theme();
        }
    }
}
