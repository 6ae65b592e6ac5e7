//! The play session state machine.
//!
//! `LOGIN -> TUTORIAL (steps 1..5) -> GAME -> END`
//!
//! Transitions are pure: [`Session::apply`] takes the current session and
//! an event and returns the next session plus the side effects the caller
//! must execute. A rejected event leaves the caller's session untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use brewlab_core::catalog;
use brewlab_core::records::round_secs;
use brewlab_core::{ActionId, FeedbackRecord, RoundLogRecord, ScenarioId, SessionId};

use crate::error::{GameError, Result};
use crate::history::SensorHistory;
use crate::resolver;
use crate::types::{AiPanel, Event, SessionView, SideEffect};

/// Minimum trimmed draft length before the AI hint can be revealed in a
/// game round.
pub const MIN_DRAFT_FOR_AI: usize = 5;

/// Inclusive bounds of the self-rated difficulty scale.
pub const DIFFICULTY_RANGE: (u8, u8) = (1, 7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Login,
    Tutorial,
    Game,
    End,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "LOGIN",
            Self::Tutorial => "TUTORIAL",
            Self::Game => "GAME",
            Self::End => "END",
        };
        f.write_str(name)
    }
}

/// Per-round interaction state, cleared whenever a new round starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundState {
    pub draft: String,
    pub ai_visible: bool,
    /// Draft as it was when the AI hint was first revealed this round.
    pub ai_snapshot: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl RoundState {
    fn started(now: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(now),
            ..Self::default()
        }
    }

    pub(crate) fn reveal_ai(&mut self) {
        self.ai_visible = true;
        if self.ai_snapshot.is_none() {
            self.ai_snapshot = Some(self.draft.clone());
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Timings {
    pub tutorial_started_at: Option<DateTime<Utc>>,
    pub tutorial_duration_secs: f64,
    pub game_started_at: Option<DateTime<Utc>>,
    pub game_ended_at: Option<DateTime<Utc>>,
}

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct Transition {
    pub session: Session,
    pub effects: Vec<SideEffect>,
}

impl Transition {
    /// Unpack into the next session and its effects.
    pub fn into_parts(self) -> (Session, Vec<SideEffect>) {
        (self.session, self.effects)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) phase: Phase,
    pub(crate) participant_id: String,
    /// Only meaningful in [`Phase::Tutorial`].
    pub(crate) tutorial_step: u8,
    pub(crate) scenario: ScenarioId,
    pub(crate) round: u32,
    pub(crate) history: SensorHistory,
    pub(crate) turn: RoundState,
    pub(crate) clock: Timings,
    pub(crate) feedback_submitted: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session waiting on the login screen.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            phase: Phase::Login,
            participant_id: String::new(),
            tutorial_step: 0,
            scenario: ScenarioId::BASELINE,
            round: 1,
            history: SensorHistory::new(),
            turn: RoundState::default(),
            clock: Timings::default(),
            feedback_submitted: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn tutorial_step(&self) -> Option<u8> {
        (self.phase == Phase::Tutorial).then_some(self.tutorial_step)
    }

    pub fn scenario(&self) -> ScenarioId {
        self.scenario
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn history(&self) -> &SensorHistory {
        &self.history
    }

    pub fn turn(&self) -> &RoundState {
        &self.turn
    }

    pub fn timings(&self) -> &Timings {
        &self.clock
    }

    pub fn feedback_submitted(&self) -> bool {
        self.feedback_submitted
    }

    /// Apply one event.
    pub fn apply(&self, event: Event, now: DateTime<Utc>) -> Result<Transition> {
        let mut next = self.clone();

        let effects = match (self.phase, event) {
            (Phase::Login, Event::StartTutorial { participant_id }) => {
                next.start_tutorial(participant_id, now)?;
                Vec::new()
            }
            (Phase::Tutorial | Phase::Game, Event::EditDraft { text }) => {
                next.turn.draft = text;
                Vec::new()
            }
            (Phase::Tutorial, event) => {
                next.apply_tutorial(event, now)?;
                Vec::new()
            }
            (Phase::Game, Event::ToggleAi) => {
                next.toggle_ai()?;
                Vec::new()
            }
            (Phase::Game, Event::CopyAiToDraft) => {
                next.copy_ai_to_draft(false)?;
                Vec::new()
            }
            (Phase::Game, Event::SubmitRound { action, difficulty }) => {
                next.submit_round(action, difficulty, now)?
            }
            (Phase::End, Event::SubmitFeedback { text }) => next.submit_feedback(text, now),
            (phase, event) => {
                return Err(GameError::InvalidEvent {
                    phase,
                    event: event.name(),
                })
            }
        };

        Ok(Transition {
            session: next,
            effects,
        })
    }

    /// Snapshot for rendering.
    pub fn view(&self, exit_code: &str) -> SessionView {
        SessionView {
            session_id: self.id,
            phase: self.phase,
            participant_id: self.participant_id.clone(),
            tutorial_step: self.tutorial_step(),
            round: self.round,
            scenario_id: self.scenario,
            scenario_name: self.scenario.scenario().name,
            history: self.history.clone(),
            draft: self.turn.draft.clone(),
            ai: self.turn.ai_visible.then(|| self.ai_panel()),
            can_reveal_ai: self.can_reveal_ai(),
            exit_code: (self.phase == Phase::End).then(|| exit_code.to_string()),
            feedback_submitted: self.feedback_submitted,
        }
    }

    pub(crate) fn ai_panel(&self) -> AiPanel {
        AiPanel {
            analysis: self.scenario.scenario().ai_hint,
            recommendation: catalog::recommendation(self.scenario),
        }
    }

    fn can_reveal_ai(&self) -> bool {
        match self.phase {
            Phase::Tutorial => self.tutorial_step == 4,
            Phase::Game => draft_len(&self.turn.draft) >= MIN_DRAFT_FOR_AI,
            Phase::Login | Phase::End => false,
        }
    }

    fn start_tutorial(&mut self, participant_id: String, now: DateTime<Utc>) -> Result<()> {
        let participant_id = participant_id.trim().to_string();
        if participant_id.is_empty() {
            return Err(GameError::missing(&["participant_id"]));
        }

        self.participant_id = participant_id;
        self.phase = Phase::Tutorial;
        // Step 1 is the login hand-off and moves straight on.
        self.tutorial_step = 2;
        self.scenario = ScenarioId::BASELINE;
        self.history.seed(ScenarioId::BASELINE);
        self.turn = RoundState::started(now);
        self.clock.tutorial_started_at = Some(now);

        tracing::info!(
            session_id = %self.id,
            prolific_id = %self.participant_id,
            "Tutorial started"
        );
        Ok(())
    }

    pub(crate) fn start_game(&mut self, now: DateTime<Utc>) {
        self.clock.tutorial_duration_secs = self
            .clock
            .tutorial_started_at
            .map(|started| elapsed_secs(started, now))
            .unwrap_or(0.0);
        self.clock.game_started_at = Some(now);

        self.phase = Phase::Game;
        self.scenario = ScenarioId::GAME_START;
        self.round = 1;
        self.history.seed(ScenarioId::GAME_START);
        self.turn = RoundState::started(now);

        tracing::info!(
            session_id = %self.id,
            tutorial_secs = self.clock.tutorial_duration_secs,
            scenario_id = self.scenario.get(),
            "Game started"
        );
    }

    fn toggle_ai(&mut self) -> Result<()> {
        if self.turn.ai_visible {
            self.turn.ai_visible = false;
            return Ok(());
        }
        if draft_len(&self.turn.draft) < MIN_DRAFT_FOR_AI {
            return Err(GameError::missing(&["assessment (at least 5 characters)"]));
        }
        self.turn.reveal_ai();
        tracing::debug!(session_id = %self.id, round = self.round, "AI hint revealed");
        Ok(())
    }

    /// Append the hint and recommendation to the draft. With `once`, a
    /// draft that already carries an AI block is left alone.
    pub(crate) fn copy_ai_to_draft(&mut self, once: bool) -> Result<()> {
        if !self.turn.ai_visible {
            return Err(GameError::InvalidEvent {
                phase: self.phase,
                event: "copy_ai_to_draft",
            });
        }
        if once && self.turn.draft.contains("AI:") {
            return Ok(());
        }
        let panel = self.ai_panel();
        self.turn
            .draft
            .push_str(&format!("\n\nAI: {}\nRec: {}", panel.analysis, panel.recommendation));
        Ok(())
    }

    fn submit_round(
        &mut self,
        action: Option<ActionId>,
        difficulty: Option<u8>,
        now: DateTime<Utc>,
    ) -> Result<Vec<SideEffect>> {
        let mut missing = Vec::new();
        if self.turn.draft.trim().is_empty() {
            missing.push("assessment");
        }
        if action.is_none() {
            missing.push("action");
        }
        match difficulty {
            None => missing.push("difficulty"),
            Some(d) if !(DIFFICULTY_RANGE.0..=DIFFICULTY_RANGE.1).contains(&d) => {
                missing.push("difficulty (1-7)")
            }
            Some(_) => {}
        }
        let (Some(action), Some(difficulty), true) = (action, difficulty, missing.is_empty()) else {
            return Err(GameError::missing(&missing));
        };

        let scenario = self.scenario.scenario();
        let assessment = self.turn.draft.clone();
        let round_duration = self
            .turn
            .started_at
            .map(|started| elapsed_secs(started, now))
            .unwrap_or(0.0);

        let record = RoundLogRecord {
            timestamp: now,
            prolific_id: self.participant_id.clone(),
            round: self.round,
            batch_num: self.history.len(),
            scenario_id: self.scenario,
            scenario_name: scenario.name.to_string(),
            assessment: assessment.clone(),
            action: action.label().to_string(),
            seq_score: difficulty,
            ai_used: self.turn.ai_snapshot.is_some(),
            text_changed: self
                .turn
                .ai_snapshot
                .as_ref()
                .is_some_and(|snapshot| *snapshot != assessment),
            ai_assessment_text: scenario.ai_hint.to_string(),
            user_assessment_final: assessment,
            tutorial_duration_seconds: self.clock.tutorial_duration_secs,
            round_duration_seconds: round_duration,
        };

        let reached = resolver::next(self.scenario, action);
        tracing::info!(
            session_id = %self.id,
            round = self.round,
            scenario_id = self.scenario.get(),
            action = action.as_str(),
            next_scenario_id = reached.get(),
            "Round submitted"
        );

        let mut effects = vec![SideEffect::LogRound(record)];

        if reached.is_baseline() {
            effects.push(SideEffect::LogRound(self.completion_record(round_duration, now)));
            self.scenario = reached;
            self.phase = Phase::End;
            self.turn = RoundState::default();
            self.clock.game_ended_at = Some(now);
            tracing::info!(
                session_id = %self.id,
                rounds = self.round,
                "Batch restored; game complete"
            );
        } else {
            self.scenario = reached;
            self.round += 1;
            self.history.advance(reached);
            self.turn = RoundState::started(now);
        }

        Ok(effects)
    }

    fn completion_record(&self, round_duration: f64, now: DateTime<Utc>) -> RoundLogRecord {
        let baseline = catalog::baseline();
        RoundLogRecord {
            timestamp: now,
            prolific_id: self.participant_id.clone(),
            round: self.round + 1,
            batch_num: self.history.len(),
            scenario_id: baseline.id,
            scenario_name: baseline.name.to_string(),
            assessment: "Simulation Complete".to_string(),
            action: "None".to_string(),
            seq_score: 0,
            ai_used: false,
            text_changed: false,
            ai_assessment_text: baseline.ai_hint.to_string(),
            user_assessment_final: "COMPLETED".to_string(),
            tutorial_duration_seconds: self.clock.tutorial_duration_secs,
            round_duration_seconds: round_duration,
        }
    }

    fn submit_feedback(&mut self, text: String, now: DateTime<Utc>) -> Vec<SideEffect> {
        if self.feedback_submitted {
            tracing::debug!(session_id = %self.id, "Feedback already recorded; ignoring");
            return Vec::new();
        }
        self.feedback_submitted = true;

        let total_time = match (self.clock.game_started_at, self.clock.game_ended_at) {
            (Some(start), Some(end)) => elapsed_secs(start, end),
            _ => 0.0,
        };

        vec![SideEffect::LogFeedback(FeedbackRecord {
            timestamp: now,
            prolific_id: self.participant_id.clone(),
            total_time_seconds: total_time,
            tutorial_duration_seconds: self.clock.tutorial_duration_secs,
            feedback_text: text,
        })]
    }
}

pub(crate) fn draft_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn elapsed_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    round_secs((end - start).num_milliseconds() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn step(session: &Session, event: Event, secs: i64) -> (Session, Vec<SideEffect>) {
        session
            .apply(event, t0() + Duration::seconds(secs))
            .unwrap()
            .into_parts()
    }

    /// A session that has just entered the game at t0 + 60s.
    fn in_game() -> Session {
        let (mut session, _) = step(
            &Session::new(),
            Event::StartTutorial {
                participant_id: " P-7 ".to_string(),
            },
            0,
        );
        session.start_game(t0() + Duration::seconds(60));
        session
    }

    fn edit(session: &Session, text: &str) -> Session {
        step(session, Event::EditDraft { text: text.to_string() }, 61).0
    }

    fn submit(session: &Session, action: ActionId, secs: i64) -> (Session, Vec<SideEffect>) {
        step(
            session,
            Event::SubmitRound {
                action: Some(action),
                difficulty: Some(4),
            },
            secs,
        )
    }

    fn rounds(effects: &[SideEffect]) -> Vec<&RoundLogRecord> {
        effects
            .iter()
            .filter_map(|e| match e {
                SideEffect::LogRound(r) => Some(r),
                SideEffect::LogFeedback(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_start_tutorial_seeds_baseline() {
        let (session, effects) = step(
            &Session::new(),
            Event::StartTutorial {
                participant_id: " P-7 ".to_string(),
            },
            0,
        );
        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Tutorial);
        assert_eq!(session.tutorial_step(), Some(2));
        assert_eq!(session.participant_id(), "P-7");
        assert_eq!(session.scenario(), ScenarioId::BASELINE);
        assert_eq!(session.history().len(), 3);
    }

    #[test]
    fn test_blank_participant_is_rejected() {
        let result = Session::new().apply(
            Event::StartTutorial {
                participant_id: "   ".to_string(),
            },
            t0(),
        );
        assert!(matches!(result, Err(GameError::Validation { .. })));
    }

    #[test]
    fn test_start_game_seeds_starting_scenario() {
        let session = in_game();
        assert_eq!(session.phase(), Phase::Game);
        assert_eq!(session.scenario(), ScenarioId::GAME_START);
        assert_eq!(session.round(), 1);
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.timings().tutorial_duration_secs, 60.0);
    }

    #[test]
    fn test_submit_names_every_missing_field() {
        let session = in_game();
        let err = session
            .apply(
                Event::SubmitRound {
                    action: None,
                    difficulty: None,
                },
                t0(),
            )
            .unwrap_err();
        match err {
            GameError::Validation { missing } => {
                assert_eq!(missing, vec!["assessment", "action", "difficulty"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_difficulty_out_of_range_is_rejected() {
        let session = edit(&in_game(), "hot and stuck");
        let err = session
            .apply(
                Event::SubmitRound {
                    action: Some(ActionId::FixTemp),
                    difficulty: Some(9),
                },
                t0(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("difficulty (1-7)"));
    }

    #[test]
    fn test_progress_round_logs_and_advances() {
        let session = edit(&in_game(), "too hot");
        let (next, effects) = submit(&session, ActionId::FixTemp, 90);

        let logged = rounds(&effects);
        assert_eq!(logged.len(), 1);
        let record = logged[0];
        assert_eq!(record.prolific_id, "P-7");
        assert_eq!(record.round, 1);
        assert_eq!(record.batch_num, 3);
        assert_eq!(record.scenario_id, ScenarioId::GAME_START);
        assert_eq!(record.action, "Fix Temperature Controller");
        assert_eq!(record.round_duration_seconds, 30.0);
        assert!(!record.ai_used);
        assert!(!record.text_changed);
        assert_eq!(record.ai_assessment_text, ScenarioId::GAME_START.scenario().ai_hint);

        assert_eq!(next.phase(), Phase::Game);
        assert_eq!(next.round(), 2);
        assert_eq!(next.scenario().get(), 3);
        assert_eq!(next.history().len(), 4);
        assert!(next.turn().draft.is_empty());
    }

    #[test]
    fn test_irrelevant_action_still_counts_a_round() {
        let session = edit(&in_game(), "looks infected");
        let (next, effects) = submit(&session, ActionId::Sterilize, 70);
        assert_eq!(effects.len(), 1);
        assert_eq!(next.scenario(), ScenarioId::GAME_START);
        assert_eq!(next.round(), 2);
        assert_eq!(next.history().len(), 4);
    }

    #[test]
    fn test_winning_round_emits_completion_record() {
        let session = edit(&in_game(), "too hot");
        let (session, _) = submit(&session, ActionId::FixTemp, 90);
        let session = edit(&session, "yeast is dead");
        let (session, effects) = submit(&session, ActionId::PitchYeast, 120);

        let logged = rounds(&effects);
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].round, 2);
        let completion = logged[1];
        assert_eq!(completion.round, 3);
        assert_eq!(completion.batch_num, logged[0].batch_num);
        assert_eq!(completion.scenario_id, ScenarioId::BASELINE);
        assert_eq!(completion.assessment, "Simulation Complete");
        assert_eq!(completion.action, "None");
        assert_eq!(completion.seq_score, 0);
        assert_eq!(completion.user_assessment_final, "COMPLETED");
        assert_eq!(completion.round_duration_seconds, logged[0].round_duration_seconds);

        assert_eq!(session.phase(), Phase::End);
        assert_eq!(session.view("CODE").exit_code.as_deref(), Some("CODE"));
    }

    #[test]
    fn test_ai_requires_enough_draft() {
        let session = edit(&in_game(), " hot ");
        let result = session.apply(Event::ToggleAi, t0());
        assert!(matches!(result, Err(GameError::Validation { .. })));
        assert!(!session.view("X").can_reveal_ai);
    }

    #[test]
    fn test_text_changed_compares_against_first_reveal() {
        let session = edit(&in_game(), "too hot here");
        let (session, _) = step(&session, Event::ToggleAi, 62);
        assert!(session.view("X").ai.is_some());
        let (session, _) = step(&session, Event::ToggleAi, 63);
        let session = edit(&session, "too hot here, yeast too");
        let (session, _) = step(&session, Event::ToggleAi, 64);
        assert_eq!(session.turn().ai_snapshot.as_deref(), Some("too hot here"));

        let (_, effects) = submit(&session, ActionId::FixTemp, 80);
        let record = rounds(&effects)[0];
        assert!(record.ai_used);
        assert!(record.text_changed);
    }

    #[test]
    fn test_copy_appends_hint_and_recommendation() {
        let session = edit(&in_game(), "seems hot");
        let (session, _) = step(&session, Event::ToggleAi, 62);
        let (session, _) = step(&session, Event::CopyAiToDraft, 63);
        let hint = ScenarioId::GAME_START.scenario().ai_hint;
        assert_eq!(
            session.turn().draft,
            format!("seems hot\n\nAI: {hint}\nRec: Fix Temperature Controller; Pitch New/Healthy Yeast")
        );
    }

    #[test]
    fn test_copy_without_visible_ai_is_rejected() {
        let session = edit(&in_game(), "seems hot");
        let result = session.apply(Event::CopyAiToDraft, t0());
        assert!(matches!(result, Err(GameError::InvalidEvent { .. })));
    }

    #[test]
    fn test_feedback_logged_once() {
        let session = edit(&in_game(), "too hot");
        let (session, _) = submit(&session, ActionId::FixTemp, 90);
        let session = edit(&session, "yeast");
        let (session, _) = submit(&session, ActionId::PitchYeast, 160);

        let feedback = Event::SubmitFeedback {
            text: "fun".to_string(),
        };
        let (session, effects) = step(&session, feedback, 200);
        match effects.as_slice() {
            [SideEffect::LogFeedback(fb)] => {
                assert_eq!(fb.total_time_seconds, 100.0);
                assert_eq!(fb.tutorial_duration_seconds, 60.0);
                assert_eq!(fb.feedback_text, "fun");
            }
            other => panic!("unexpected effects {other:?}"),
        }

        let repeat = Event::SubmitFeedback {
            text: "again".to_string(),
        };
        let (again, effects) = step(&session, repeat, 210);
        assert!(effects.is_empty());
        assert!(again.feedback_submitted());
    }

    #[test]
    fn test_events_outside_their_phase_are_rejected() {
        let result = Session::new().apply(
            Event::SubmitRound {
                action: Some(ActionId::FixTemp),
                difficulty: Some(3),
            },
            t0(),
        );
        match result {
            Err(GameError::InvalidEvent { phase, event }) => {
                assert_eq!(phase, Phase::Login);
                assert_eq!(event, "submit_round");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rejected_event_leaves_session_unchanged() {
        let session = in_game();
        let before = session.clone();
        let _ = session.apply(
            Event::SubmitRound {
                action: None,
                difficulty: Some(3),
            },
            t0(),
        );
        assert_eq!(session, before);
    }
}
