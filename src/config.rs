use crate::core::operation::{DEFAULT_DELAY, DEFAULT_MARKER};
use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Upper bound accepted for `delay_ms`
pub const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chain: ChainConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_parameter")]
    pub parameter: i64,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_true")]
    pub color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_chain_markers")]
    pub markers: Vec<String>,
}

// The program's literal argument; it lands on the rejection branch.
fn default_parameter() -> i64 {
    8
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY.as_millis() as u64
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_true() -> bool {
    true
}

fn default_chain_markers() -> Vec<String> {
    ["A", "B", "C", "D"].iter().map(|m| m.to_string()).collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            parameter: default_parameter(),
            delay_ms: default_delay_ms(),
            marker: default_marker(),
            color: default_true(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            markers: default_chain_markers(),
        }
    }
}

/// Markers must contain something other than whitespace
pub fn validate_marker(marker: &str) -> AppResult<()> {
    if marker.trim().is_empty() {
        return Err(AppError::Config("Marker cannot be blank".to_string()));
    }
    Ok(())
}

pub fn validate_delay_ms(delay_ms: u64) -> AppResult<()> {
    if delay_ms > MAX_DELAY_MS {
        return Err(AppError::Config(format!(
            "delay_ms must not exceed {}",
            MAX_DELAY_MS
        )));
    }
    Ok(())
}

impl Config {
    /// Load from `config_path`, falling back to defaults when the file is absent
    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        validate_marker(&self.general.marker)?;
        validate_delay_ms(self.general.delay_ms)?;

        for marker in &self.chain.markers {
            validate_marker(marker)?;
        }

        Ok(())
    }

    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        std::fs::write(config_path, self.to_toml()?).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("deferred-op")
            .join("config.toml")
    }
}
