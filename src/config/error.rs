//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid users service URL")]
    InvalidUsersUrl,

    #[error("Invalid workouts service URL")]
    InvalidWorkoutsUrl,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Workout fetch limit must be between 1 and 500")]
    InvalidFetchLimit,
}
