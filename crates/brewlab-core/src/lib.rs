//! brewlab-core: Shared types, scenario catalog, configuration, and error
//! handling for the Brewlab fermentation troubleshooting study.
//!
//! This crate provides the foundational pieces used by every Brewlab crate:
//! - Cause tags, corrective actions, and sensor definitions
//! - The static scenario catalog with its canonical AI hints
//! - Round and feedback log records with their fixed column layouts
//! - Layered configuration loading
//! - Common error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod records;
pub mod types;

pub use error::BrewlabError;
pub use records::{FeedbackRecord, RoundLogRecord};
pub use types::{
    ActionId, CauseSet, CauseTag, Scenario, ScenarioId, Sensor, SensorReadings, SessionId,
};
