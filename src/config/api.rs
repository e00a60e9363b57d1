//! Remote service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote users/workouts service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the users service
    #[serde(default = "default_users_base_url")]
    pub users_base_url: String,

    /// Base URL of the workouts service
    #[serde(default = "default_workouts_base_url")]
    pub workouts_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of workouts fetched on refresh
    #[serde(default = "default_workout_fetch_limit")]
    pub workout_fetch_limit: u32,
}

impl ApiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.users_base_url) {
            return Err(ValidationError::InvalidUsersUrl);
        }
        if !is_http_url(&self.workouts_base_url) {
            return Err(ValidationError::InvalidWorkoutsUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.workout_fetch_limit == 0 || self.workout_fetch_limit > 500 {
            return Err(ValidationError::InvalidFetchLimit);
        }
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    rest.is_some_and(|host| !host.trim_matches('/').is_empty())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            users_base_url: default_users_base_url(),
            workouts_base_url: default_workouts_base_url(),
            timeout_secs: default_timeout(),
            workout_fetch_limit: default_workout_fetch_limit(),
        }
    }
}

fn default_users_base_url() -> String {
    "https://users-pqqbcehmea-uc.a.run.app/".to_string()
}

fn default_workouts_base_url() -> String {
    "https://workouts-pqqbcehmea-uc.a.run.app/".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_workout_fetch_limit() -> u32 {
    20
}
