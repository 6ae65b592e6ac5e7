//! brewlab-analytics: Metrics derivation over Brewlab study logs.
//!
//! Repairs historical round and feedback rows, reconstructs missing round
//! durations, derives text and AI-similarity metrics, and groups
//! participants into behavioral clusters.

pub mod backfill;
pub mod cluster;
pub mod config;
pub mod error;
pub mod overview;
pub mod pipeline;
pub mod repair;
pub mod similarity;
pub mod text;

pub use cluster::{Cluster, ParticipantAggregate};
pub use config::AnalyticsConfig;
pub use error::AnalyticsError;
pub use pipeline::{run, run_from_source, DerivedRecord, PipelineOutput};
pub use repair::RepairReport;
