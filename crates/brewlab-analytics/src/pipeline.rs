//! The metrics derivation pipeline.
//!
//! repair -> backfill -> text metrics -> similarity -> aggregation
//!
//! Batch and read-only: the same input always yields the same output, and
//! no stage can abort the run over a bad field.

use serde::Serialize;

use brewlab_records::{RawRow, RecordSource};

use crate::backfill::backfill;
use crate::cluster::{aggregate, ParticipantAggregate};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::overview::{overview, DatasetOverview};
use crate::repair::{repair_feedback, repair_round, RepairReport, RepairedFeedback, RepairedRecord};
use crate::similarity::ai_similarity;
use crate::text::{complexity, text_len};

/// A repaired round record with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    #[serde(flatten)]
    pub record: RepairedRecord,
    pub time_diff_secs: f64,
    pub effective_duration_secs: f64,
    pub text_len: usize,
    pub complexity: f64,
    pub ai_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Sorted by participant, then timestamp.
    pub records: Vec<DerivedRecord>,
    pub feedback: Vec<RepairedFeedback>,
    /// Sorted by participant.
    pub participants: Vec<ParticipantAggregate>,
    pub overview: DatasetOverview,
    pub round_repairs: RepairReport,
    pub feedback_repairs: RepairReport,
}

/// Run every stage over in-memory batches.
pub fn run(
    rounds: &[RawRow],
    feedback_rows: &[RawRow],
    config: &AnalyticsConfig,
) -> PipelineOutput {
    let mut round_repairs = RepairReport::default();
    let repaired: Vec<_> = rounds
        .iter()
        .map(|row| {
            let (record, issues) = repair_round(row);
            round_repairs.record(&issues);
            record
        })
        .collect();

    let mut feedback_repairs = RepairReport::default();
    let feedback: Vec<_> = feedback_rows
        .iter()
        .map(|row| {
            let (fb, issues) = repair_feedback(row);
            feedback_repairs.record(&issues);
            fb
        })
        .collect();

    let records: Vec<DerivedRecord> = backfill(repaired, &config.backfill)
        .into_iter()
        .map(|b| {
            let final_text = if b.record.user_assessment_final.is_empty() {
                &b.record.assessment
            } else {
                &b.record.user_assessment_final
            };
            let similarity =
                ai_similarity(b.record.ai_used, final_text, &b.record.ai_assessment_text);
            DerivedRecord {
                text_len: text_len(&b.record.assessment),
                complexity: complexity(&b.record.assessment),
                ai_similarity: similarity,
                time_diff_secs: b.time_diff_secs,
                effective_duration_secs: b.effective_duration_secs,
                record: b.record,
            }
        })
        .collect();

    let participants = aggregate(&records, &config.cluster);
    let overview = overview(records.iter().map(|r| &r.record), &feedback);

    for (batch, report) in [("rounds", &round_repairs), ("feedback", &feedback_repairs)] {
        if !report.is_clean() {
            tracing::warn!(
                batch,
                rows = report.rows,
                rows_repaired = report.rows_repaired,
                defaulted_fields = report.defaulted_fields(),
                missing = ?report.missing,
                unparseable = ?report.unparseable,
                "Defaulted fields during repair"
            );
        }
    }

    tracing::info!(
        records = records.len(),
        participants = participants.len(),
        feedback = feedback.len(),
        "Pipeline complete"
    );

    PipelineOutput {
        records,
        feedback,
        participants,
        overview,
        round_repairs,
        feedback_repairs,
    }
}

/// Load both batches from `source` and run the pipeline.
pub fn run_from_source<S: RecordSource + ?Sized>(
    source: &S,
    config: &AnalyticsConfig,
) -> Result<PipelineOutput> {
    let rounds = source.load_rounds()?;
    let feedback = source.load_feedback()?;
    Ok(run(&rounds, &feedback, config))
}
