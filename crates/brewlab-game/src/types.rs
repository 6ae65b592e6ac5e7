//! Events fed into a session and what comes back out of it.

use serde::{Deserialize, Serialize};

use brewlab_core::{ActionId, FeedbackRecord, RoundLogRecord, ScenarioId, SessionId};

use crate::history::SensorHistory;
use crate::session::Phase;

/// Participant input. Sent one per line to `brewlab-game play`, e.g.
/// `{"type":"submit_round","action":"fix_temp","difficulty":4}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StartTutorial {
        participant_id: String,
    },
    /// Replace the assessment draft.
    EditDraft {
        text: String,
    },
    ToggleAi,
    CopyAiToDraft,
    /// Move past tutorial steps 2 to 4. Step 4 needs the chosen action.
    ContinueTutorial {
        #[serde(default)]
        action: Option<ActionId>,
    },
    FinishTutorial,
    /// Submit the current draft as this round's assessment.
    SubmitRound {
        #[serde(default)]
        action: Option<ActionId>,
        #[serde(default)]
        difficulty: Option<u8>,
    },
    SubmitFeedback {
        text: String,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartTutorial { .. } => "start_tutorial",
            Self::EditDraft { .. } => "edit_draft",
            Self::ToggleAi => "toggle_ai",
            Self::CopyAiToDraft => "copy_ai_to_draft",
            Self::ContinueTutorial { .. } => "continue_tutorial",
            Self::FinishTutorial => "finish_tutorial",
            Self::SubmitRound { .. } => "submit_round",
            Self::SubmitFeedback { .. } => "submit_feedback",
        }
    }
}

/// Work a transition asks the caller to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    LogRound(RoundLogRecord),
    LogFeedback(FeedbackRecord),
}

/// The AI panel as shown to the participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiPanel {
    pub analysis: &'static str,
    pub recommendation: String,
}

/// Read-only snapshot for the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub phase: Phase,
    pub participant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutorial_step: Option<u8>,
    pub round: u32,
    pub scenario_id: ScenarioId,
    pub scenario_name: &'static str,
    pub history: SensorHistory,
    pub draft: String,
    /// Present while the AI hint is visible.
    pub ai: Option<AiPanel>,
    pub can_reveal_ai: bool,
    /// Completion code, only in the end phase.
    pub exit_code: Option<String>,
    pub feedback_submitted: bool,
}

/// Result of handling one event through the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HandleOutcome {
    /// Records written to the sink.
    pub logged: usize,
    /// Records the sink rejected.
    pub failed: usize,
}
