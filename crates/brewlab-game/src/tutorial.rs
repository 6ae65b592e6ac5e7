//! Guided tutorial, steps 2 to 5.
//!
//! | step | scenario | to move on |
//! |------|----------|------------|
//! | 2 | baseline | assessment mentions "good" |
//! | 3 | 5 (sanitation) | assessment of 3+ characters |
//! | 4 | 5 | AI may be shown; choose Sterilize Equipment |
//! | 5 | 5 | finish, which starts the game |

use chrono::{DateTime, Utc};

use brewlab_core::{ActionId, ScenarioId};

use crate::error::{GameError, Result};
use crate::session::{draft_len, Phase, RoundState, Session};
use crate::types::Event;

const MIN_HYPOTHESIS_LEN: usize = 3;
const EXPECTED_ACTION: ActionId = ActionId::Sterilize;

impl Session {
    pub(crate) fn apply_tutorial(&mut self, event: Event, now: DateTime<Utc>) -> Result<()> {
        match (self.tutorial_step, event) {
            (2, Event::ContinueTutorial { .. }) => {
                if !self.turn.draft.to_lowercase().contains("good") {
                    return Err(GameError::missing(&["assessment mentioning \"good\""]));
                }
                self.tutorial_step = 3;
                self.scenario = ScenarioId::TUTORIAL_DEMO;
                self.history.seed(ScenarioId::TUTORIAL_DEMO);
                self.turn = RoundState::default();
            }
            (3, Event::ContinueTutorial { .. }) => {
                if draft_len(&self.turn.draft) < MIN_HYPOTHESIS_LEN {
                    return Err(GameError::missing(&["assessment (at least 3 characters)"]));
                }
                self.tutorial_step = 4;
            }
            (4, Event::ToggleAi) => self.turn.reveal_ai(),
            (4, Event::CopyAiToDraft) => self.copy_ai_to_draft(true)?,
            (4, Event::ContinueTutorial { action }) => match action {
                None => return Err(GameError::missing(&["action"])),
                Some(action) if action != EXPECTED_ACTION => {
                    return Err(GameError::missing(&["action (Sterilize Equipment)"]));
                }
                Some(_) => {
                    self.tutorial_step = 5;
                    self.turn = RoundState::default();
                }
            },
            (5, Event::FinishTutorial) => {
                self.start_game(now);
                return Ok(());
            }
            (_, event) => {
                return Err(GameError::InvalidEvent {
                    phase: Phase::Tutorial,
                    event: event.name(),
                })
            }
        }

        tracing::debug!(session_id = %self.id, step = self.tutorial_step, "Tutorial step");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn send(session: &Session, event: Event) -> Result<Session> {
        session.apply(event, now()).map(|t| t.session)
    }

    fn draft(session: &Session, text: &str) -> Session {
        send(session, Event::EditDraft { text: text.to_string() }).unwrap()
    }

    fn proceed(session: &Session) -> Result<Session> {
        send(session, Event::ContinueTutorial { action: None })
    }

    fn at_step_four() -> Session {
        let session = send(
            &Session::new(),
            Event::StartTutorial {
                participant_id: "P-1".to_string(),
            },
        )
        .unwrap();
        let session = proceed(&draft(&session, "All GOOD here")).unwrap();
        proceed(&draft(&session, "sour")).unwrap()
    }

    #[test]
    fn test_step_two_needs_good() {
        let session = send(
            &Session::new(),
            Event::StartTutorial {
                participant_id: "P-1".to_string(),
            },
        )
        .unwrap();
        let rejected = proceed(&draft(&session, "fine"));
        assert!(matches!(rejected, Err(GameError::Validation { .. })));

        let next = proceed(&draft(&session, "looks Good")).unwrap();
        assert_eq!(next.tutorial_step(), Some(3));
        assert_eq!(next.scenario(), ScenarioId::TUTORIAL_DEMO);
        assert_eq!(next.history().len(), 3);
        assert!(next.turn().draft.is_empty());
    }

    #[test]
    fn test_step_three_needs_a_hypothesis() {
        let session = send(
            &Session::new(),
            Event::StartTutorial {
                participant_id: "P-1".to_string(),
            },
        )
        .unwrap();
        let session = proceed(&draft(&session, "good")).unwrap();
        assert!(proceed(&draft(&session, " ab ")).is_err());
        assert_eq!(at_step_four().tutorial_step(), Some(4));
    }

    #[test]
    fn test_step_four_reveals_and_copies_once() {
        let session = send(&at_step_four(), Event::ToggleAi).unwrap();
        let view = session.view("X");
        assert_eq!(view.ai.map(|ai| ai.recommendation), Some("Sterilize Equipment".to_string()));

        let copied = send(&session, Event::CopyAiToDraft).unwrap();
        let twice = send(&copied, Event::CopyAiToDraft).unwrap();
        assert_eq!(copied.turn().draft, twice.turn().draft);
        assert_eq!(twice.turn().draft.matches("AI:").count(), 1);
        assert!(twice.turn().draft.starts_with("sour\n\nAI: "));
    }

    #[test]
    fn test_step_four_requires_sterilize() {
        let session = at_step_four();
        assert!(proceed(&session).is_err());
        let wrong = send(
            &session,
            Event::ContinueTutorial {
                action: Some(ActionId::FixTemp),
            },
        );
        assert!(wrong.unwrap_err().to_string().contains("Sterilize Equipment"));

        let next = send(
            &session,
            Event::ContinueTutorial {
                action: Some(ActionId::Sterilize),
            },
        )
        .unwrap();
        assert_eq!(next.tutorial_step(), Some(5));
    }

    #[test]
    fn test_ai_toggle_only_on_step_four() {
        let session = send(
            &Session::new(),
            Event::StartTutorial {
                participant_id: "P-1".to_string(),
            },
        )
        .unwrap();
        let result = send(&session, Event::ToggleAi);
        assert!(matches!(
            result,
            Err(GameError::InvalidEvent {
                phase: Phase::Tutorial,
                event: "toggle_ai"
            })
        ));
    }

    #[test]
    fn test_finish_starts_game() {
        let session = send(
            &at_step_four(),
            Event::ContinueTutorial {
                action: Some(ActionId::Sterilize),
            },
        )
        .unwrap();
        assert!(send(&session, Event::SubmitRound { action: None, difficulty: None }).is_err());

        let game = send(&session, Event::FinishTutorial).unwrap();
        assert_eq!(game.phase(), Phase::Game);
        assert_eq!(game.tutorial_step(), None);
        assert_eq!(game.scenario(), ScenarioId::GAME_START);
        assert_eq!(game.round(), 1);
    }
}
