//! Schema repair and type normalization of raw log rows.
//!
//! Historical rows come from several versions of the logger and may be
//! missing columns or carry values of the wrong type. Every field is
//! repaired to a default instead of failing; what was defaulted is
//! reported back in [`FieldIssues`] and summed into a [`RepairReport`].

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use brewlab_records::RawRow;

/// A round row after repair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairedRecord {
    pub prolific_id: String,
    /// `None` when absent or unparseable.
    pub timestamp: Option<DateTime<Utc>>,
    pub round: Option<u32>,
    pub batch_num: Option<u32>,
    pub scenario_id: Option<u32>,
    pub scenario_name: String,
    pub assessment: String,
    pub action: String,
    /// Self-rated difficulty, `None` when unparseable.
    pub seq_score: Option<f64>,
    pub ai_used: bool,
    pub text_changed: bool,
    pub ai_assessment_text: String,
    pub user_assessment_final: String,
    pub tutorial_duration_seconds: f64,
    pub round_duration_seconds: f64,
}

/// A feedback row after repair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairedFeedback {
    pub prolific_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub total_time_seconds: f64,
    pub tutorial_duration_seconds: f64,
    pub feedback_text: String,
}

/// Columns of one row that had to be defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldIssues {
    /// Absent or null.
    pub missing: Vec<&'static str>,
    /// Present but not of the expected type.
    pub unparseable: Vec<&'static str>,
}

impl FieldIssues {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unparseable.is_empty()
    }
}

/// Per-column counts of defaulted fields over a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub rows: usize,
    /// Rows with at least one defaulted field.
    pub rows_repaired: usize,
    pub missing: BTreeMap<&'static str, usize>,
    pub unparseable: BTreeMap<&'static str, usize>,
}

impl RepairReport {
    pub fn record(&mut self, issues: &FieldIssues) {
        self.rows += 1;
        if issues.is_empty() {
            return;
        }
        self.rows_repaired += 1;
        for &column in &issues.missing {
            *self.missing.entry(column).or_default() += 1;
        }
        for &column in &issues.unparseable {
            *self.unparseable.entry(column).or_default() += 1;
        }
    }

    /// Total number of defaulted fields.
    pub fn defaulted_fields(&self) -> usize {
        self.missing.values().sum::<usize>() + self.unparseable.values().sum::<usize>()
    }

    pub fn is_clean(&self) -> bool {
        self.rows_repaired == 0
    }
}

/// Reads typed fields out of one row, noting what had to be defaulted.
struct FieldReader<'a> {
    row: &'a RawRow,
    issues: FieldIssues,
}

impl<'a> FieldReader<'a> {
    fn new(row: &'a RawRow) -> Self {
        Self {
            row,
            issues: FieldIssues::default(),
        }
    }

    fn present(&mut self, column: &'static str) -> Option<&'a Value> {
        match self.row.get(column) {
            None | Some(Value::Null) => {
                self.issues.missing.push(column);
                None
            }
            Some(value) => Some(value),
        }
    }

    fn text(&mut self, column: &'static str) -> String {
        match self.present(column) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => flag_text(*b).to_string(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    /// Seconds; anything non-numeric becomes 0.
    fn seconds(&mut self, column: &'static str) -> f64 {
        let Some(value) = self.present(column) else {
            return 0.0;
        };
        match number(value) {
            Some(secs) => secs,
            None => {
                self.issues.unparseable.push(column);
                0.0
            }
        }
    }

    /// Case-insensitive `true`/`false`; anything else is `false`.
    fn flag(&mut self, column: &'static str) -> bool {
        let Some(value) = self.present(column) else {
            return false;
        };
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.unwrap_or_else(|| {
            self.issues.unparseable.push(column);
            false
        })
    }

    fn optional_number(&mut self, column: &'static str) -> Option<f64> {
        let value = self.present(column)?;
        let parsed = number(value);
        if parsed.is_none() {
            self.issues.unparseable.push(column);
        }
        parsed
    }

    fn whole(&mut self, column: &'static str) -> Option<u32> {
        self.optional_number(column)
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
            .map(|n| n as u32)
    }

    fn timestamp(&mut self, column: &'static str) -> Option<DateTime<Utc>> {
        let value = self.present(column)?;
        let parsed = value.as_str().and_then(parse_timestamp);
        if parsed.is_none() {
            self.issues.unparseable.push(column);
        }
        parsed
    }
}

fn flag_text(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

/// RFC 3339, or a naive ISO-8601 date-time taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Repair one round row.
pub fn repair_round(row: &RawRow) -> (RepairedRecord, FieldIssues) {
    let mut fields = FieldReader::new(row);
    let record = RepairedRecord {
        prolific_id: fields.text("prolific_id"),
        timestamp: fields.timestamp("timestamp"),
        round: fields.whole("round"),
        batch_num: fields.whole("batch_num"),
        scenario_id: fields.whole("scenario_id"),
        scenario_name: fields.text("scenario_name"),
        assessment: fields.text("assessment"),
        action: fields.text("action"),
        seq_score: fields.optional_number("seq_score"),
        ai_used: fields.flag("ai_used"),
        text_changed: fields.flag("text_changed"),
        ai_assessment_text: fields.text("ai_assessment_text"),
        user_assessment_final: fields.text("user_assessment_final"),
        tutorial_duration_seconds: fields.seconds("tutorial_duration_seconds"),
        round_duration_seconds: fields.seconds("round_duration_seconds"),
    };
    (record, fields.issues)
}

/// Repair one feedback row. `*_seconds` columns default to 0, text to "".
pub fn repair_feedback(row: &RawRow) -> (RepairedFeedback, FieldIssues) {
    let mut fields = FieldReader::new(row);
    let feedback = RepairedFeedback {
        prolific_id: fields.text("prolific_id"),
        timestamp: fields.timestamp("timestamp"),
        total_time_seconds: fields.seconds("total_time_seconds"),
        tutorial_duration_seconds: fields.seconds("tutorial_duration_seconds"),
        feedback_text: fields.text("feedback_text"),
    };
    (feedback, fields.issues)
}
