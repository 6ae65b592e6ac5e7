//! Dataset-level summary figures.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::repair::{RepairedFeedback, RepairedRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub records: usize,
    pub participants: usize,
    /// Participants who used AI in at least one record.
    pub ai_users: usize,
    pub control: usize,
    /// Mean feedback total time; `None` without feedback.
    pub mean_total_time_secs: Option<f64>,
    /// Records logged from the first history batch.
    pub tutorial_batch_records: usize,
    pub game_batch_records: usize,
}

pub fn overview<'a>(
    records: impl IntoIterator<Item = &'a RepairedRecord>,
    feedback: &[RepairedFeedback],
) -> DatasetOverview {
    let mut total = 0;
    let mut participants = BTreeSet::new();
    let mut ai_users = BTreeSet::new();
    let mut tutorial_batch_records = 0;
    let mut game_batch_records = 0;

    for record in records {
        total += 1;
        participants.insert(record.prolific_id.as_str());
        if record.ai_used {
            ai_users.insert(record.prolific_id.as_str());
        }
        match record.batch_num {
            Some(1) => tutorial_batch_records += 1,
            Some(n) if n > 1 => game_batch_records += 1,
            _ => {}
        }
    }

    let mean_total_time_secs = (!feedback.is_empty()).then(|| {
        feedback.iter().map(|f| f.total_time_seconds).sum::<f64>() / feedback.len() as f64
    });

    DatasetOverview {
        records: total,
        participants: participants.len(),
        ai_users: ai_users.len(),
        control: participants.len() - ai_users.len(),
        mean_total_time_secs,
        tutorial_batch_records,
        game_batch_records,
    }
}
