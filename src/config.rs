use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use page_display::DEFAULT_TARGET_WIDTH;
use page_display::page::SCALABLE_CLASS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub logging: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Directory where log files will be stored
    pub directory: String,
    /// Log file name prefix (date will be appended)
    pub file_prefix: String,
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: "./logs".to_string(),
            file_prefix: "home_display".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub port: u16,
    /// Directory holding home.html and its assets
    pub static_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            static_dir: "static".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub refresh_interval_ms: u64,
    pub target_width: f64,
    /// Class tag of the elements to auto-scale
    pub scalable_class: String,
    /// A scheduled task older than this fails the healthcheck
    pub health_tolerance_seconds: u64,
    pub metrics_interval_seconds: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 500,
            target_width: DEFAULT_TARGET_WIDTH,
            scalable_class: SCALABLE_CLASS.to_string(),
            health_tolerance_seconds: 5,
            metrics_interval_seconds: 60,
        }
    }
}

impl DisplayConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn health_tolerance(&self) -> Duration {
        Duration::from_secs(self.health_tolerance_seconds)
    }

    pub fn metrics_interval(&self) -> Duration {
        Duration::from_secs(self.metrics_interval_seconds)
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.web.port == 0 {
            return Err("web.port must be non-zero".to_string());
        }
        if self.display.refresh_interval_ms == 0 {
            return Err("display.refresh_interval_ms must be non-zero".to_string());
        }
        if !self.display.target_width.is_finite() || self.display.target_width <= 0.0 {
            return Err(format!(
                "display.target_width must be a positive number, got {}",
                self.display.target_width
            ));
        }
        if self.display.health_tolerance_seconds == 0 {
            return Err("display.health_tolerance_seconds must be non-zero".to_string());
        }
        if self.display.metrics_interval_seconds == 0 {
            return Err("display.metrics_interval_seconds must be non-zero".to_string());
        }
        if self.display.scalable_class.trim().is_empty() {
            return Err("display.scalable_class must not be empty".to_string());
        }
        Ok(())
    }
}
