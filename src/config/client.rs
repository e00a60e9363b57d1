//! Client-side configuration: whose data to show and how to log

use serde::Deserialize;

use super::error::ValidationError;

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// User every request is scoped to
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// IANA timezone attached to workouts created on this device.
    /// Defaults to the host's zone.
    pub timezone: Option<String>,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ClientConfig {
    /// Configured timezone, or the host's when unset or blank
    pub fn timezone(&self) -> String {
        self.timezone
            .as_deref()
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .map_or_else(system_timezone, str::to_string)
    }

    /// Validate client configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("USER_ID"));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            timezone: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// IANA name of the host's timezone, `UTC` when it cannot be determined
pub fn system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|e| {
        tracing::debug!("Host timezone unavailable, using UTC: {}", e);
        "UTC".to_string()
    })
}

fn default_user_id() -> String {
    "kun".to_string()
}

fn default_log_level() -> String {
    "info,fitness_tracker=debug".to_string()
}
