use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::problem::loader::DEFAULT_SPECIFICATION;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_specification")]
    pub specification: String,
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_generator_base_url")]
    pub generator_base_url: String,
    #[serde(default = "default_certificate_dir")]
    pub certificate_dir: String,
    #[serde(default = "default_instructor")]
    pub instructor: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_specification() -> String {
    DEFAULT_SPECIFICATION.to_string()
}
fn default_placeholder_name() -> String {
    "Student".to_string()
}
fn default_fetch_timeout_secs() -> u64 {
    10
}
fn default_generator_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_certificate_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parsons")
        .join("certificates")
        .to_string_lossy()
        .to_string()
}
fn default_instructor() -> String {
    "Instructor".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            specification: default_specification(),
            placeholder_name: default_placeholder_name(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            generator_base_url: default_generator_base_url(),
            certificate_dir: default_certificate_dir(),
            instructor: default_instructor(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parsons")
            .join("config.toml")
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Reset blank or out-of-range values to their defaults.
    pub fn validate(&mut self) {
        if self.specification.trim().is_empty() {
            self.specification = default_specification();
        }
        if self.placeholder_name.trim().is_empty() {
            self.placeholder_name = default_placeholder_name();
        } else {
            self.placeholder_name = self.placeholder_name.trim().to_string();
        }
        self.fetch_timeout_secs = self.fetch_timeout_secs.clamp(1, 120);
        if self.generator_base_url.trim().is_empty() {
            self.generator_base_url = default_generator_base_url();
        }
        self.generator_base_url = self.generator_base_url.trim_end_matches('/').to_string();
        if self.certificate_dir.trim().is_empty() {
            self.certificate_dir = default_certificate_dir();
        }
    }
}
