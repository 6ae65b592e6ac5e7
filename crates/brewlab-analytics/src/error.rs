//! Error types for the brewlab-analytics crate.
//!
//! Malformed field values never surface here; they are repaired and
//! counted in the [`RepairReport`](crate::repair::RepairReport). Only
//! failures to obtain the batches at all are errors.

use thiserror::Error;

use brewlab_records::StoreError;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Record source error: {0}")]
    Source(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
