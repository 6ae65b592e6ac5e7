use thiserror::Error;

/// Top-level error type for the Brewlab core.
#[derive(Error, Debug)]
pub enum BrewlabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(u8),

    #[error("Unknown cause tag: {0}")]
    UnknownCause(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

pub type Result<T> = std::result::Result<T, BrewlabError>;
