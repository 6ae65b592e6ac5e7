//! Per-participant aggregation and behavioral clustering.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ClusterConfig;
use crate::pipeline::DerivedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cluster {
    /// Leans on the AI and writes little of their own.
    Copier,
    /// Writes detailed assessments.
    Improver,
    Needer,
}

/// Classify by AI usage and mean complexity. Rules apply in order.
pub fn classify(ai_usage: f64, mean_complexity: f64, config: &ClusterConfig) -> Cluster {
    if ai_usage > config.copier_min_ai_usage && mean_complexity < config.copier_max_complexity {
        Cluster::Copier
    } else if mean_complexity >= config.improver_min_complexity {
        Cluster::Improver
    } else {
        Cluster::Needer
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantAggregate {
    pub prolific_id: String,
    pub records: usize,
    /// Fraction of records with AI used.
    pub ai_usage: f64,
    pub mean_round_duration: f64,
    pub mean_complexity: f64,
    /// Over parseable difficulty ratings only; 0 if there are none.
    pub mean_difficulty: f64,
    pub mean_text_len: f64,
    /// Over AI-used records only; `None` if AI was never used.
    pub mean_similarity: Option<f64>,
    pub cluster: Cluster,
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Group records by participant, ordered by participant id.
pub fn aggregate(records: &[DerivedRecord], config: &ClusterConfig) -> Vec<ParticipantAggregate> {
    let mut groups: BTreeMap<&str, Vec<&DerivedRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.record.prolific_id.as_str())
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(id, group)| {
            let ai_usage =
                mean(group.iter().map(|r| f64::from(u8::from(r.record.ai_used)))).unwrap_or(0.0);
            let mean_complexity = mean(group.iter().map(|r| r.complexity)).unwrap_or(0.0);

            ParticipantAggregate {
                prolific_id: id.to_string(),
                records: group.len(),
                ai_usage,
                mean_round_duration: mean(group.iter().map(|r| r.effective_duration_secs))
                    .unwrap_or(0.0),
                mean_complexity,
                mean_difficulty: mean(group.iter().filter_map(|r| r.record.seq_score))
                    .unwrap_or(0.0),
                mean_text_len: mean(group.iter().map(|r| r.text_len as f64)).unwrap_or(0.0),
                mean_similarity: mean(
                    group
                        .iter()
                        .filter(|r| r.record.ai_used)
                        .map(|r| r.ai_similarity),
                ),
                cluster: classify(ai_usage, mean_complexity, config),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_priority() {
        let config = ClusterConfig::default();
        assert_eq!(classify(0.8, 30.0, &config), Cluster::Copier);
        assert_eq!(classify(0.2, 150.0, &config), Cluster::Improver);
        assert_eq!(classify(0.0, 10.0, &config), Cluster::Needer);
        // High usage with rich text is not copying.
        assert_eq!(classify(0.9, 120.0, &config), Cluster::Improver);
        assert_eq!(classify(0.6, 10.0, &config), Cluster::Needer);
        assert_eq!(classify(0.2, 100.0, &config), Cluster::Improver);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ClusterConfig {
            copier_min_ai_usage: 0.3,
            copier_max_complexity: 50.0,
            improver_min_complexity: 60.0,
        };
        assert_eq!(classify(0.5, 40.0, &config), Cluster::Copier);
        assert_eq!(classify(0.1, 70.0, &config), Cluster::Improver);
    }

    #[test]
    fn test_mean_of_nothing() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean(vec![1.0, 2.0]), Some(1.5));
    }
}
