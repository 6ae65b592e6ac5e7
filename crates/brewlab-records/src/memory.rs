//! In-memory sink, used by tests and dry runs.

use std::sync::Mutex;

use brewlab_core::{FeedbackRecord, RoundLogRecord};

use crate::store::{RecordSink, RecordSource, StoreError};
use crate::{feedback_to_row, round_to_row, RawRow};

/// Keeps every record in memory. Can be built to reject all writes so
/// callers can exercise their sink-failure handling.
#[derive(Debug, Default)]
pub struct MemorySink {
    rounds: Mutex<Vec<RoundLogRecord>>,
    feedback: Mutex<Vec<FeedbackRecord>>,
    reject_writes: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose appends always fail.
    pub fn failing() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    pub fn rounds(&self) -> Vec<RoundLogRecord> {
        self.rounds.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn feedback(&self) -> Vec<FeedbackRecord> {
        self.feedback.lock().map(|f| f.clone()).unwrap_or_default()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Unavailable("memory sink is read-only".to_string()));
        }
        Ok(())
    }
}

impl RecordSink for MemorySink {
    fn append_round(&self, record: &RoundLogRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.rounds
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .push(record.clone());
        Ok(())
    }

    fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.feedback
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
            .push(record.clone());
        Ok(())
    }
}

impl RecordSource for MemorySink {
    fn load_rounds(&self) -> Result<Vec<RawRow>, StoreError> {
        self.rounds().iter().map(round_to_row).collect()
    }

    fn load_feedback(&self) -> Result<Vec<RawRow>, StoreError> {
        self.feedback().iter().map(feedback_to_row).collect()
    }
}
