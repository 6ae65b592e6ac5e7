//! Record storage traits and the JSON-lines file implementation.
//!
//! Round and feedback records are appended to two line-delimited JSON
//! files, mirroring the two sheets the study writes to:
//! ```text
//! {root}/
//!   rounds.jsonl
//!   feedback.jsonl
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use brewlab_core::{FeedbackRecord, RoundLogRecord};

use crate::RawRow;

/// Errors that can occur during record storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record sink unavailable: {0}")]
    Unavailable(String),

    #[error("Stored value is not a row object: {0}")]
    NotARow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for records emitted by a play session.
pub trait RecordSink {
    /// Append one round record.
    fn append_round(&self, record: &RoundLogRecord) -> Result<(), StoreError>;

    /// Append one feedback record.
    fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), StoreError>;
}

impl<T: RecordSink + ?Sized> RecordSink for &T {
    fn append_round(&self, record: &RoundLogRecord) -> Result<(), StoreError> {
        (**self).append_round(record)
    }

    fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), StoreError> {
        (**self).append_feedback(record)
    }
}

/// Origin of the historical record batches consumed by analytics.
pub trait RecordSource {
    /// Every stored round row, in storage order.
    fn load_rounds(&self) -> Result<Vec<RawRow>, StoreError>;

    /// Every stored feedback row, in storage order.
    fn load_feedback(&self) -> Result<Vec<RawRow>, StoreError>;
}

/// File-system backed record store.
pub struct JsonlRecordStore {
    root: PathBuf,
}

impl JsonlRecordStore {
    pub const ROUNDS_FILE: &'static str = "rounds.jsonl";
    pub const FEEDBACK_FILE: &'static str = "feedback.jsonl";

    /// Create a new store rooted at the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn rounds_path(&self) -> PathBuf {
        self.root.join(Self::ROUNDS_FILE)
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.root.join(Self::FEEDBACK_FILE)
    }
}

impl RecordSink for JsonlRecordStore {
    fn append_round(&self, record: &RoundLogRecord) -> Result<(), StoreError> {
        let path = self.rounds_path();
        append_line(&path, &serde_json::to_string(record)?)?;

        tracing::debug!(
            prolific_id = %record.prolific_id,
            round = record.round,
            path = %path.display(),
            "Round record appended"
        );

        Ok(())
    }

    fn append_feedback(&self, record: &FeedbackRecord) -> Result<(), StoreError> {
        let path = self.feedback_path();
        append_line(&path, &serde_json::to_string(record)?)?;

        tracing::debug!(
            prolific_id = %record.prolific_id,
            path = %path.display(),
            "Feedback record appended"
        );

        Ok(())
    }
}

impl RecordSource for JsonlRecordStore {
    fn load_rounds(&self) -> Result<Vec<RawRow>, StoreError> {
        read_rows(&self.rounds_path())
    }

    fn load_feedback(&self) -> Result<Vec<RawRow>, StoreError> {
        read_rows(&self.feedback_path())
    }
}

fn append_line(path: &Path, line: &str) -> Result<(), StoreError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

/// Read a JSON-lines file into rows.
///
/// A missing file is an empty batch. Lines that are blank, not valid JSON,
/// or not a JSON object are skipped with a warning.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(serde_json::Value::Object(row)) => rows.push(row),
            Ok(_) | Err(_) => {
                tracing::warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    "Skipping malformed row"
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped,
            kept = rows.len(),
            "Malformed rows skipped"
        );
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewlab_core::ScenarioId;
    use chrono::Utc;

    fn round(prolific_id: &str, round: u32) -> RoundLogRecord {
        RoundLogRecord {
            timestamp: Utc::now(),
            prolific_id: prolific_id.to_string(),
            round,
            batch_num: 3,
            scenario_id: ScenarioId::GAME_START,
            scenario_name: "6: Temp & Yeast".to_string(),
            assessment: "hot and sluggish".to_string(),
            action: "Fix Temperature Controller".to_string(),
            seq_score: 4,
            ai_used: false,
            text_changed: false,
            ai_assessment_text: String::new(),
            user_assessment_final: "hot and sluggish".to_string(),
            tutorial_duration_seconds: 30.0,
            round_duration_seconds: 20.5,
        }
    }

    #[test]
    fn append_and_load_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlRecordStore::new(dir.path()).unwrap();

        store.append_round(&round("P-1", 1)).unwrap();
        store.append_round(&round("P-1", 2)).unwrap();

        let rows = store.load_rounds().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["prolific_id"], "P-1");
        assert_eq!(rows[1]["round"], 2);
        assert_eq!(rows[1]["ai_used"], false);
    }

    #[test]
    fn feedback_goes_to_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlRecordStore::new(dir.path()).unwrap();

        store
            .append_feedback(&FeedbackRecord {
                timestamp: Utc::now(),
                prolific_id: "P-1".to_string(),
                total_time_seconds: 120.0,
                tutorial_duration_seconds: 30.0,
                feedback_text: "nice".to_string(),
            })
            .unwrap();

        assert!(store.load_rounds().unwrap().is_empty());
        let feedback = store.load_feedback().unwrap();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0]["feedback_text"], "nice");
    }

    #[test]
    fn missing_files_are_empty_batches() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlRecordStore::new(dir.path().join("nested")).unwrap();
        assert!(store.load_rounds().unwrap().is_empty());
        assert!(store.load_feedback().unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.jsonl");
        fs::write(
            &path,
            "{\"prolific_id\":\"A\"}\nnot json\n\n[1,2]\n{\"prolific_id\":\"B\",\"ai_used\":\"True\"}\n",
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["ai_used"], "True");
    }
}
