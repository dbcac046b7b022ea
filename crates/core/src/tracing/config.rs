//! Configuration for tracing output

use crate::config::LoggingSettings;
use serde::{Deserialize, Serialize};

/// Main instrumentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentationConfig {
    /// Service name recorded on startup
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Log level filter (e.g., "info", "debug", "trace")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            service_name: "banquet".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl InstrumentationConfig {
    /// Build from the logging section of the settings file
    pub fn from_settings(service_name: impl Into<String>, logging: &LoggingSettings) -> Self {
        Self {
            service_name: service_name.into(),
            log_level: logging.level.clone(),
            json: logging.json,
            ..Self::default()
        }
    }
}
