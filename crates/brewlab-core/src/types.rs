//! Core domain types for the fermentation game.
//!
//! Cause tags, corrective actions, and sensors are closed enumerations.
//! Scenario identifiers are validated against the static catalog at
//! construction, so a `ScenarioId` in hand always resolves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::error::BrewlabError;

// ── Session ───────────────────────────────────────────────────────

/// Identifier used to correlate the log lines of one play session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Cause Tags ────────────────────────────────────────────────────

/// A root cause that contributes to a scenario's fault state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CauseTag {
    #[serde(rename = "C1")]
    TemperatureControl,
    #[serde(rename = "C2")]
    YeastHealth,
    #[serde(rename = "C3")]
    OxygenExposure,
    #[serde(rename = "C4")]
    Sanitation,
}

impl CauseTag {
    pub const ALL: [CauseTag; 4] = [
        Self::TemperatureControl,
        Self::YeastHealth,
        Self::OxygenExposure,
        Self::Sanitation,
    ];

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TemperatureControl => "C1",
            Self::YeastHealth => "C2",
            Self::OxygenExposure => "C3",
            Self::Sanitation => "C4",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::TemperatureControl => "temperature control",
            Self::YeastHealth => "yeast health",
            Self::OxygenExposure => "oxygen exposure",
            Self::Sanitation => "sanitation",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::TemperatureControl => 0b0001,
            Self::YeastHealth => 0b0010,
            Self::OxygenExposure => 0b0100,
            Self::Sanitation => 0b1000,
        }
    }
}

impl fmt::Display for CauseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CauseTag {
    type Err = BrewlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C1" => Ok(Self::TemperatureControl),
            "C2" => Ok(Self::YeastHealth),
            "C3" => Ok(Self::OxygenExposure),
            "C4" => Ok(Self::Sanitation),
            _ => Err(BrewlabError::UnknownCause(s.to_string())),
        }
    }
}

/// An unordered set of active cause tags.
///
/// Serialized as a list of tag codes in canonical `C1..C4` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CauseTag>", into = "Vec<CauseTag>")]
pub struct CauseSet(u8);

impl CauseSet {
    pub const EMPTY: CauseSet = CauseSet(0);

    #[must_use]
    pub const fn from_tags(tags: &[CauseTag]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < tags.len() {
            bits |= tags[i].bit();
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn contains(self, tag: CauseTag) -> bool {
        self.0 & tag.bit() != 0
    }

    #[must_use]
    pub const fn with(self, tag: CauseTag) -> Self {
        Self(self.0 | tag.bit())
    }

    #[must_use]
    pub const fn without(self, tag: CauseTag) -> Self {
        Self(self.0 & !tag.bit())
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = CauseTag> {
        CauseTag::ALL.into_iter().filter(move |tag| self.contains(*tag))
    }
}

impl FromIterator<CauseTag> for CauseSet {
    fn from_iter<I: IntoIterator<Item = CauseTag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<Vec<CauseTag>> for CauseSet {
    fn from(tags: Vec<CauseTag>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<CauseSet> for Vec<CauseTag> {
    fn from(set: CauseSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for CauseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(CauseTag::code).collect();
        write!(f, "{{{}}}", codes.join(","))
    }
}

// ── Actions ───────────────────────────────────────────────────────

/// A corrective action. Each action remedies exactly one cause tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    FixTemp,
    PitchYeast,
    ManageOxygen,
    Sterilize,
}

impl ActionId {
    pub const ALL: [ActionId; 4] = [
        Self::FixTemp,
        Self::PitchYeast,
        Self::ManageOxygen,
        Self::Sterilize,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixTemp => "fix_temp",
            Self::PitchYeast => "pitch_yeast",
            Self::ManageOxygen => "manage_oxygen",
            Self::Sterilize => "sterilize",
        }
    }

    /// Display label shown to participants and written to the round log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FixTemp => "Fix Temperature Controller",
            Self::PitchYeast => "Pitch New/Healthy Yeast",
            Self::ManageOxygen => "Improve Oxygen Management",
            Self::Sterilize => "Sterilize Equipment",
        }
    }

    /// The cause tag this action remedies.
    #[must_use]
    pub const fn fixes(self) -> CauseTag {
        match self {
            Self::FixTemp => CauseTag::TemperatureControl,
            Self::PitchYeast => CauseTag::YeastHealth,
            Self::ManageOxygen => CauseTag::OxygenExposure,
            Self::Sterilize => CauseTag::Sanitation,
        }
    }

    /// The unique action that remedies `cause`.
    #[must_use]
    pub const fn for_cause(cause: CauseTag) -> Self {
        match cause {
            CauseTag::TemperatureControl => Self::FixTemp,
            CauseTag::YeastHealth => Self::PitchYeast,
            CauseTag::OxygenExposure => Self::ManageOxygen,
            CauseTag::Sanitation => Self::Sterilize,
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = BrewlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fix_temp" => Ok(Self::FixTemp),
            "pitch_yeast" => Ok(Self::PitchYeast),
            "manage_oxygen" => Ok(Self::ManageOxygen),
            "sterilize" => Ok(Self::Sterilize),
            _ => Err(BrewlabError::UnknownAction(s.to_string())),
        }
    }
}

// ── Sensors ───────────────────────────────────────────────────────

/// One of the four fermentation sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sensor {
    #[serde(rename = "sg")]
    SpecificGravity,
    #[serde(rename = "wortTemp")]
    WortTemp,
    #[serde(rename = "co2Activity")]
    Co2Activity,
    #[serde(rename = "ph")]
    Ph,
}

impl Sensor {
    pub const ALL: [Sensor; 4] = [
        Self::SpecificGravity,
        Self::WortTemp,
        Self::Co2Activity,
        Self::Ph,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SpecificGravity => "sg",
            Self::WortTemp => "wortTemp",
            Self::Co2Activity => "co2Activity",
            Self::Ph => "ph",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SpecificGravity => "SG",
            Self::WortTemp => "Wort Temp",
            Self::Co2Activity => "CO2 Activity",
            Self::Ph => "pH",
        }
    }

    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::SpecificGravity | Self::Ph => "",
            Self::WortTemp => "°C",
            Self::Co2Activity => "b/min",
        }
    }

    /// Fixed chart axis range `(min, max)`.
    #[must_use]
    pub const fn display_range(self) -> (f64, f64) {
        match self {
            Self::SpecificGravity => (0.990, 1.060),
            Self::WortTemp => (10.0, 30.0),
            Self::Co2Activity => (0.0, 50.0),
            Self::Ph => (3.0, 6.0),
        }
    }

    /// Healthy fermentation band `(low, high)`, inclusive.
    #[must_use]
    pub const fn normal_range(self) -> (f64, f64) {
        match self {
            Self::SpecificGravity => (1.020, 1.035),
            Self::WortTemp => (19.5, 20.5),
            Self::Co2Activity => (15.0, 25.0),
            Self::Ph => (4.4, 4.6),
        }
    }

    #[must_use]
    pub fn is_normal(self, value: f64) -> bool {
        let (low, high) = self.normal_range();
        (low..=high).contains(&value)
    }

    /// Position of this sensor in [`Sensor::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::SpecificGravity => 0,
            Self::WortTemp => 1,
            Self::Co2Activity => 2,
            Self::Ph => 3,
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The four sensor readings a scenario produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReadings {
    pub sg: f64,
    pub wort_temp: f64,
    pub co2_activity: f64,
    pub ph: f64,
}

impl SensorReadings {
    #[must_use]
    pub const fn get(&self, sensor: Sensor) -> f64 {
        match sensor {
            Sensor::SpecificGravity => self.sg,
            Sensor::WortTemp => self.wort_temp,
            Sensor::Co2Activity => self.co2_activity,
            Sensor::Ph => self.ph,
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────────

/// Identifier of a catalog scenario.
///
/// Construction goes through [`ScenarioId::new`], which rejects ids the
/// catalog does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ScenarioId(u8);

impl ScenarioId {
    /// The "all good" scenario; reaching it wins the game.
    pub const BASELINE: ScenarioId = ScenarioId(1);
    /// The scenario walked through in tutorial steps 3 and 4.
    pub const TUTORIAL_DEMO: ScenarioId = ScenarioId(5);
    /// Where every game round 1 starts.
    pub const GAME_START: ScenarioId = ScenarioId(6);

    pub fn new(raw: u8) -> Result<Self, BrewlabError> {
        if catalog::contains(raw) {
            Ok(Self(raw))
        } else {
            Err(BrewlabError::ScenarioNotFound(raw))
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The catalog entry for this id.
    #[must_use]
    pub fn scenario(self) -> &'static Scenario {
        catalog::scenario(self)
    }

    #[must_use]
    pub fn is_baseline(self) -> bool {
        self == Self::BASELINE
    }

    pub(crate) const fn from_catalog(raw: u8) -> Self {
        Self(raw)
    }
}

impl TryFrom<u8> for ScenarioId {
    type Error = BrewlabError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ScenarioId> for u8 {
    fn from(id: ScenarioId) -> Self {
        id.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed combination of active causes plus the readings it produces.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub name: &'static str,
    pub causes: CauseSet,
    pub readings: SensorReadings,
    /// Canonical diagnostic text revealed by the AI hint.
    pub ai_hint: &'static str,
}

impl Scenario {
    /// Actions that would remove one of this scenario's active causes.
    pub fn remedies(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.causes.iter().map(ActionId::for_cause)
    }
}
