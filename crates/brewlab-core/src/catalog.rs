//! The static scenario catalog.
//!
//! Fifteen scenarios cover the cause combinations used by the study. The
//! id set is sparse on purpose: id 11 does not exist, and neither does a
//! scenario for the `{C2, C3, C4}` combination.

use crate::error::{BrewlabError, Result};
use crate::types::{ActionId, CauseSet, CauseTag, Scenario, ScenarioId, SensorReadings};

use CauseTag::{
    OxygenExposure as C3, Sanitation as C4, TemperatureControl as C1, YeastHealth as C2,
};

const fn entry(
    id: u8,
    name: &'static str,
    causes: &[CauseTag],
    readings: [f64; 4],
    ai_hint: &'static str,
) -> Scenario {
    Scenario {
        id: ScenarioId::from_catalog(id),
        name,
        causes: CauseSet::from_tags(causes),
        readings: SensorReadings {
            sg: readings[0],
            wort_temp: readings[1],
            co2_activity: readings[2],
            ph: readings[3],
        },
        ai_hint,
    }
}

/// Every scenario, ordered by id. Readings are `[sg, wortTemp, co2Activity, ph]`.
#[rustfmt::skip]
pub static SCENARIOS: [Scenario; 15] = [
    entry(1, "1: All Good", &[], [1.025, 20.0, 20.0, 4.5],
        "All sensors report normal readings within their ideal fermentation ranges. The process appears stable and healthy."),
    entry(2, "2: Temp Control Fail", &[C1], [1.018, 25.5, 40.0, 4.6],
        "Wort Temp: High (25.5°C). CO2: Very High. SG: Dropping normally. High temp accelerates fermentation but produces off-flavors."),
    entry(3, "3: Yeast Health Issue", &[C2], [1.045, 19.0, 3.0, 5.0],
        "SG: High (1.045). CO2: Very Low. Wort Temp: Low side. Hints at unhealthy yeast that's failing to start fermentation."),
    entry(4, "4: Oxygen Exposure", &[C3], [1.018, 21.0, 35.0, 4.4],
        "CO2: Active. SG: Dropping. But Wort Temp is slightly high and pH is dropping faster than expected? Check for Oxygen ingress."),
    entry(5, "5: Sanitation Fail", &[C4], [1.008, 19.5, 7.0, 3.2],
        "pH: Significant, continuous drop (souring). SG: Dropped too low. CO2: Low activity. Hints at bacterial contamination."),
    entry(6, "6: Temp & Yeast", &[C1, C2], [1.050, 25.5, 1.0, 5.0],
        "Extremely slow or no SG drop, low CO2, high temp. The yeast is stressed by heat and poor health."),
    entry(7, "7: Temp & Oxygen", &[C1, C3], [1.022, 25.5, 45.0, 4.7],
        "Wort Temp: High. CO2: Very High. Fast fermentation, but likely oxidizing due to agitation or leaks."),
    entry(8, "8: Temp & Sanitation", &[C1, C4], [1.002, 26.0, 20.0, 2.8],
        "Wort Temp: High. pH: Very Low (Acidic). SG: Very Low. High temp encouraged bacterial growth (Lactobacillus?)."),
    entry(9, "9: Yeast & Oxygen", &[C2, C3], [1.048, 19.0, 2.0, 5.1],
        "SG: High (stuck). pH: High (no acid production). Yeast isn't working, and oxygen might be stalling it."),
    entry(10, "10: Yeast & Sanitation", &[C2, C4], [1.010, 19.5, 4.0, 3.5],
        "SG: Slow drop. pH: Low. Sanitation failed, and the weak yeast couldn't outcompete the bacteria."),
    entry(12, "12: Oxygen & Sanitation", &[C3, C4], [1.005, 19.5, 10.0, 3.0],
        "pH: Very Low. CO2: Moderate. Oxygen leak might be fueling acetobacter or other aerobic bacteria."),
    entry(13, "13: Temp, Yeast, Oxygen", &[C1, C2, C3], [1.048, 25.5, 1.0, 5.1],
        "SG: High. Temp: High. Yeast won't start despite the heat. Oxygen might be confusing the yeast phase."),
    entry(14, "14: Temp, Yeast, Sanitation", &[C1, C2, C4], [1.008, 26.0, 5.0, 3.0],
        "Total collapse. High Temp + Bad Yeast + bacteria taking over. pH is crashing."),
    entry(15, "15: Temp, Oxygen, Sanitation", &[C1, C3, C4], [1.001, 26.5, 15.0, 2.7],
        "High Temp + Oxygen + Bacteria. This is making vinegar, not beer."),
    entry(16, "16: All Together", &[C1, C2, C3, C4], [1.040, 26.0, 2.0, 3.5],
        "All systems failing. High Temp, Bad Yeast, Oxygen leak, and Infection. Dump it."),
];

/// Recommendation text shown when no cause is active.
pub const NO_ACTION_NEEDED: &str = "No action needed.";

fn position(raw: u8) -> Option<usize> {
    SCENARIOS.iter().position(|s| s.id.get() == raw)
}

/// Whether the catalog has a scenario with this id.
pub fn contains(raw: u8) -> bool {
    position(raw).is_some()
}

/// Look up a scenario by raw id.
pub fn get(raw: u8) -> Result<&'static Scenario> {
    position(raw)
        .map(|i| &SCENARIOS[i])
        .ok_or(BrewlabError::ScenarioNotFound(raw))
}

/// Look up a scenario by validated id.
pub(crate) fn scenario(id: ScenarioId) -> &'static Scenario {
    // ScenarioId is only constructed for ids present in SCENARIOS.
    let index = position(id.get()).unwrap_or(0);
    &SCENARIOS[index]
}

/// The unique scenario with no active causes.
pub fn baseline() -> &'static Scenario {
    ScenarioId::BASELINE.scenario()
}

/// All scenarios, ordered by id.
pub fn all() -> &'static [Scenario] {
    &SCENARIOS
}

/// The scenario whose cause set is exactly `causes`, if the catalog has one.
pub fn find_by_causes(causes: CauseSet) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.causes == causes)
}

/// Labels of every action that remedies an active cause, `"; "`-joined.
pub fn recommendation(id: ScenarioId) -> String {
    let labels: Vec<&str> = id.scenario().remedies().map(ActionId::label).collect();
    if labels.is_empty() {
        NO_ACTION_NEEDED.to_string()
    } else {
        labels.join("; ")
    }
}
