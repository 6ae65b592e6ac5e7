//! Brewlab Records: where play sessions write, and analytics reads.
//!
//! A session emits [`RoundLogRecord`]s and one [`FeedbackRecord`] through a
//! [`RecordSink`]. The analytics pipeline later pulls every stored row back
//! through a [`RecordSource`] as loosely-typed [`RawRow`]s, because rows
//! written by older schema versions may miss columns or carry mixed types.

pub mod memory;
pub mod store;

pub use memory::MemorySink;
pub use store::{read_rows, JsonlRecordStore, RecordSink, RecordSource, StoreError};

use brewlab_core::{FeedbackRecord, RoundLogRecord};

/// One stored row, keyed by column name.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Convert a typed record into the row shape a [`RecordSource`] yields.
pub fn round_to_row(record: &RoundLogRecord) -> Result<RawRow, StoreError> {
    into_row(serde_json::to_value(record)?)
}

/// Convert a feedback record into the row shape a [`RecordSource`] yields.
pub fn feedback_to_row(record: &FeedbackRecord) -> Result<RawRow, StoreError> {
    into_row(serde_json::to_value(record)?)
}

fn into_row(value: serde_json::Value) -> Result<RawRow, StoreError> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StoreError::NotARow(other.to_string())),
    }
}
