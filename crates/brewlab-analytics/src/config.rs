//! Configuration for the metrics pipeline.

use serde::Deserialize;

/// Top-level analytics configuration.
///
/// Loaded from the `brewlab.toml` `[analytics]` section or
/// `BREWLAB_ANALYTICS__` environment variables, e.g.
/// `BREWLAB_ANALYTICS__CLUSTER__COPIER_MIN_AI_USAGE=0.5`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub backfill: BackfillConfig,
}

/// Thresholds of the behavioral clustering rule.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClusterConfig {
    /// AI-usage fraction a Copier must exceed.
    #[serde(default = "default_copier_min_ai_usage")]
    pub copier_min_ai_usage: f64,

    /// Mean complexity a Copier must stay below.
    #[serde(default = "default_copier_max_complexity")]
    pub copier_max_complexity: f64,

    /// Mean complexity an Improver must reach.
    #[serde(default = "default_improver_min_complexity")]
    pub improver_min_complexity: f64,
}

/// Bounds used when reconstructing missing round durations.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BackfillConfig {
    /// Logged durations at or below this are treated as missing.
    #[serde(default = "default_min_logged_duration_secs")]
    pub min_logged_duration_secs: f64,

    /// Gaps at or above this are breaks, not round time.
    #[serde(default = "default_max_gap_secs")]
    pub max_gap_secs: f64,
}

fn default_copier_min_ai_usage() -> f64 {
    0.6
}

fn default_copier_max_complexity() -> f64 {
    50.0
}

fn default_improver_min_complexity() -> f64 {
    100.0
}

fn default_min_logged_duration_secs() -> f64 {
    0.1
}

fn default_max_gap_secs() -> f64 {
    3600.0
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            copier_min_ai_usage: default_copier_min_ai_usage(),
            copier_max_complexity: default_copier_max_complexity(),
            improver_min_complexity: default_improver_min_complexity(),
        }
    }
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            min_logged_duration_secs: default_min_logged_duration_secs(),
            max_gap_secs: default_max_gap_secs(),
        }
    }
}
