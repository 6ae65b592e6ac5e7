//! Error types for the brewlab-game crate.

use thiserror::Error;

use crate::session::Phase;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Missing required input: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Event {event} is not accepted in phase {phase}")]
    InvalidEvent { phase: Phase, event: &'static str },
}

impl GameError {
    pub(crate) fn missing(fields: &[&str]) -> Self {
        Self::Validation {
            missing: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
