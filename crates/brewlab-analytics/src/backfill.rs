//! Round duration backfill.
//!
//! Early logger versions wrote zero round durations. The time between a
//! participant's consecutive records stands in for the missing value when
//! it looks like real play time.

use std::cmp::Ordering;

use crate::config::BackfillConfig;
use crate::repair::RepairedRecord;

/// A record with its reconstructed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Backfilled {
    pub record: RepairedRecord,
    /// Seconds since the participant's previous record; 0 for the first
    /// record or when either timestamp is unknown.
    pub time_diff_secs: f64,
    pub effective_duration_secs: f64,
}

/// Order by participant, then timestamp, then round, then batch number.
/// Unknown values sort after known ones at each level, so the order does
/// not depend on how the batch was read.
pub fn sort_records(records: &mut [RepairedRecord]) {
    records.sort_by(|a, b| {
        a.prolific_id
            .cmp(&b.prolific_id)
            .then_with(|| nones_last(a.timestamp, b.timestamp))
            .then_with(|| nones_last(a.round, b.round))
            .then_with(|| nones_last(a.batch_num, b.batch_num))
    });
}

fn nones_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The duration credited to a round.
pub fn effective_duration(logged: f64, gap: f64, config: &BackfillConfig) -> f64 {
    if logged > config.min_logged_duration_secs {
        logged
    } else if gap > 0.0 && gap < config.max_gap_secs {
        gap
    } else {
        0.0
    }
}

/// Sort the batch and compute every record's gap and effective duration.
pub fn backfill(mut records: Vec<RepairedRecord>, config: &BackfillConfig) -> Vec<Backfilled> {
    sort_records(&mut records);

    let mut out: Vec<Backfilled> = Vec::with_capacity(records.len());
    for record in records {
        let gap = out
            .last()
            .filter(|prev| prev.record.prolific_id == record.prolific_id)
            .and_then(|prev| Some((prev.record.timestamp?, record.timestamp?)))
            .map(|(prev, current)| (current - prev).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        let effective = effective_duration(record.round_duration_seconds, gap, config);
        out.push(Backfilled {
            record,
            time_diff_secs: gap,
            effective_duration_secs: effective,
        });
    }

    let reconstructed = out
        .iter()
        .filter(|b| b.effective_duration_secs != b.record.round_duration_seconds)
        .count();
    if reconstructed > 0 {
        tracing::debug!(reconstructed, total = out.len(), "Round durations backfilled from gaps");
    }

    out
}
