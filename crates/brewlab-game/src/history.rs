//! Rolling per-sensor reading history.
//!
//! Four parallel sequences, one per [`Sensor`], always the same length and
//! never longer than [`HISTORY_CAP`].

use serde::ser::{Serialize, SerializeMap, Serializer};

use brewlab_core::{ScenarioId, Sensor, SensorReadings};

/// Maximum number of readings kept per sensor.
pub const HISTORY_CAP: usize = 8;

/// Baseline readings placed ahead of the starting scenario on seed.
pub const BASELINE_SEED_ROUNDS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorHistory {
    series: [Vec<f64>; 4],
}

impl SensorHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the history with two baseline readings followed by `start`.
    pub fn seed(&mut self, start: ScenarioId) {
        for series in &mut self.series {
            series.clear();
        }
        let baseline = ScenarioId::BASELINE.scenario().readings;
        for _ in 0..BASELINE_SEED_ROUNDS {
            self.push(&baseline);
        }
        self.push(&start.scenario().readings);
    }

    /// Append the readings of `scenario`. Returns `false` and leaves the
    /// history untouched once it holds [`HISTORY_CAP`] readings.
    pub fn advance(&mut self, scenario: ScenarioId) -> bool {
        if self.is_full() {
            tracing::debug!(scenario = scenario.get(), "Sensor history full; reading dropped");
            return false;
        }
        self.push(&scenario.scenario().readings);
        true
    }

    /// Number of readings per sensor.
    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= HISTORY_CAP
    }

    pub fn series(&self, sensor: Sensor) -> &[f64] {
        &self.series[sensor.index()]
    }

    /// Most recent readings, if any.
    pub fn latest(&self) -> Option<SensorReadings> {
        let at = |sensor: Sensor| self.series(sensor).last().copied();
        Some(SensorReadings {
            sg: at(Sensor::SpecificGravity)?,
            wort_temp: at(Sensor::WortTemp)?,
            co2_activity: at(Sensor::Co2Activity)?,
            ph: at(Sensor::Ph)?,
        })
    }

    fn push(&mut self, readings: &SensorReadings) {
        for sensor in Sensor::ALL {
            self.series[sensor.index()].push(readings.get(sensor));
        }
    }
}

// Rendered as `{"sg": [..], "wortTemp": [..], ...}`.
impl Serialize for SensorHistory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Sensor::ALL.len()))?;
        for sensor in Sensor::ALL {
            map.serialize_entry(sensor.key(), self.series(sensor))?;
        }
        map.end()
    }
}
