//! Scenario transitions: how a corrective action moves the batch from one
//! scenario to the next.
//!
//! An action removes the cause it fixes from the current cause set. The
//! batch moves to the scenario with exactly the remaining causes. When the
//! catalog has no such scenario the batch stays where it is.

use brewlab_core::catalog;
use brewlab_core::{ActionId, CauseSet, ScenarioId};

/// Outcome of applying one action to a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The action's cause is not active. Nothing changes.
    Irrelevant,
    /// The cause was removed and the remaining set maps to this scenario.
    Progress(ScenarioId),
    /// The cause was removed but no scenario has the remaining set.
    Unresolvable { remaining: CauseSet },
}

/// Classify what `action` does to `current`.
pub fn resolve(current: ScenarioId, action: ActionId) -> Resolution {
    let causes = current.scenario().causes;
    let fixed = action.fixes();

    if !causes.contains(fixed) {
        return Resolution::Irrelevant;
    }

    let remaining = causes.without(fixed);
    match catalog::find_by_causes(remaining) {
        Some(scenario) => Resolution::Progress(scenario.id),
        None => Resolution::Unresolvable { remaining },
    }
}

/// The scenario the batch is in after `action`.
///
/// Irrelevant and unresolvable actions leave the batch unchanged.
pub fn next(current: ScenarioId, action: ActionId) -> ScenarioId {
    match resolve(current, action) {
        Resolution::Progress(id) => id,
        Resolution::Irrelevant => current,
        Resolution::Unresolvable { remaining } => {
            tracing::warn!(
                scenario = current.get(),
                action = action.as_str(),
                remaining = %remaining,
                "No scenario for remaining causes; batch unchanged"
            );
            current
        }
    }
}

/// A shortest action sequence from `start` to the baseline.
///
/// Each step takes the first action (in [`ActionId::ALL`] order) that makes
/// progress. Every progressing step removes one cause, so the path length
/// equals the number of active causes. Returns `None` if some reachable
/// scenario has no progressing action.
pub fn solution_path(start: ScenarioId) -> Option<Vec<ActionId>> {
    let mut current = start;
    let mut path = Vec::new();

    while !current.is_baseline() {
        let (action, reached) = ActionId::ALL.into_iter().find_map(|action| {
            match resolve(current, action) {
                Resolution::Progress(id) => Some((action, id)),
                _ => None,
            }
        })?;
        path.push(action);
        current = reached;
    }

    Some(path)
}
