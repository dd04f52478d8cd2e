//! Error types for the onboarding service.
//!
//! The profile store and the validators never fail. `Error` covers startup
//! (configuration and the initial snapshot load). `OnboardingError` is what a
//! session reports back to a screen.

use crate::onboarding::OnboardingStep;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Profile snapshot persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Repository unavailable: {0}")]
    Unavailable(String),
}

/// Errors a session reports back to the calling screen.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Either an email or a phone number is required")]
    MissingContact,

    #[error("Unrecognized goal: {goal}")]
    UnrecognizedGoal { goal: String },

    #[error("Onboarding incomplete, missing: {}", display_steps(.missing))]
    Incomplete { missing: Vec<OnboardingStep> },
}

fn display_steps(steps: &[OnboardingStep]) -> String {
    steps
        .iter()
        .map(|s| s.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
