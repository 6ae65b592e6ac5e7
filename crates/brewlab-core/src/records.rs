//! Append-only log records produced by a play session.
//!
//! Records are written once to the logging sink and never mutated. Fixed
//! column sinks must use the column order in [`ROUND_LOG_COLUMNS`] and
//! [`FEEDBACK_COLUMNS`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ScenarioId;

/// Column order of a round log row.
pub const ROUND_LOG_COLUMNS: [&str; 15] = [
    "timestamp",
    "prolific_id",
    "round",
    "batch_num",
    "scenario_id",
    "scenario_name",
    "assessment",
    "action",
    "seq_score",
    "ai_used",
    "text_changed",
    "ai_assessment_text",
    "user_assessment_final",
    "tutorial_duration_seconds",
    "round_duration_seconds",
];

/// Column order of a feedback row.
pub const FEEDBACK_COLUMNS: [&str; 5] = [
    "timestamp",
    "prolific_id",
    "total_time_seconds",
    "tutorial_duration_seconds",
    "feedback_text",
];

/// One submitted round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundLogRecord {
    pub timestamp: DateTime<Utc>,
    /// Participant identifier.
    pub prolific_id: String,
    pub round: u32,
    /// Sensor history length when the round was submitted.
    pub batch_num: usize,
    pub scenario_id: ScenarioId,
    pub scenario_name: String,
    pub assessment: String,
    /// Action label, or `"None"` for the completion record.
    pub action: String,
    /// Self-rated difficulty (1-7); 0 on the completion record.
    pub seq_score: u8,
    pub ai_used: bool,
    pub text_changed: bool,
    pub ai_assessment_text: String,
    pub user_assessment_final: String,
    pub tutorial_duration_seconds: f64,
    pub round_duration_seconds: f64,
}

impl RoundLogRecord {
    /// Stringified values in [`ROUND_LOG_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_timestamp(&self.timestamp),
            self.prolific_id.clone(),
            self.round.to_string(),
            self.batch_num.to_string(),
            self.scenario_id.to_string(),
            self.scenario_name.clone(),
            self.assessment.clone(),
            self.action.clone(),
            self.seq_score.to_string(),
            format_flag(self.ai_used),
            format_flag(self.text_changed),
            self.ai_assessment_text.clone(),
            self.user_assessment_final.clone(),
            self.tutorial_duration_seconds.to_string(),
            self.round_duration_seconds.to_string(),
        ]
    }
}

/// End-of-session feedback, one per participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRecord {
    pub timestamp: DateTime<Utc>,
    pub prolific_id: String,
    pub total_time_seconds: f64,
    pub tutorial_duration_seconds: f64,
    pub feedback_text: String,
}

impl FeedbackRecord {
    /// Stringified values in [`FEEDBACK_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_timestamp(&self.timestamp),
            self.prolific_id.clone(),
            self.total_time_seconds.to_string(),
            self.tutorial_duration_seconds.to_string(),
            self.feedback_text.clone(),
        ]
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Historical sheets store flags capitalized.
fn format_flag(flag: bool) -> String {
    let text = if flag { "True" } else { "False" };
    text.to_string()
}

/// Round seconds to two decimals, the precision every duration is logged at.
pub fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_round() -> RoundLogRecord {
        RoundLogRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            prolific_id: "P-001".to_string(),
            round: 2,
            batch_num: 4,
            scenario_id: ScenarioId::GAME_START,
            scenario_name: "6: Temp & Yeast".to_string(),
            assessment: "too hot".to_string(),
            action: "Fix Temperature Controller".to_string(),
            seq_score: 5,
            ai_used: true,
            text_changed: false,
            ai_assessment_text: "hint".to_string(),
            user_assessment_final: "too hot".to_string(),
            tutorial_duration_seconds: 61.5,
            round_duration_seconds: 12.25,
        }
    }

    #[test]
    fn round_row_follows_column_order() {
        let row = sample_round().to_row();
        assert_eq!(row.len(), ROUND_LOG_COLUMNS.len());
        assert_eq!(row[0], "2025-03-01T12:00:00.000000Z");
        assert_eq!(row[1], "P-001");
        assert_eq!(row[4], "6");
        assert_eq!(row[9], "True");
        assert_eq!(row[10], "False");
        assert_eq!(row[14], "12.25");
    }

    #[test]
    fn round_json_uses_column_names() {
        let json = serde_json::to_value(sample_round()).unwrap();
        let object = json.as_object().unwrap();
        for column in ROUND_LOG_COLUMNS {
            assert!(object.contains_key(column), "missing {column}");
        }
        assert_eq!(object["scenario_id"], 6);
    }

    #[test]
    fn feedback_row_follows_column_order() {
        let record = FeedbackRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap(),
            prolific_id: "P-001".to_string(),
            total_time_seconds: 300.5,
            tutorial_duration_seconds: 61.5,
            feedback_text: "fun".to_string(),
        };
        let row = record.to_row();
        assert_eq!(row.len(), FEEDBACK_COLUMNS.len());
        assert_eq!(row[2], "300.5");
        assert_eq!(row[4], "fun");
    }

    #[test]
    fn rounding_to_two_decimals() {
        assert_eq!(round_secs(12.345_6), 12.35);
        assert_eq!(round_secs(0.0), 0.0);
    }
}
