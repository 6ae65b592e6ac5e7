//! Plays whole sessions through the driver against the file store.

use chrono::{DateTime, Duration, TimeZone, Utc};

use brewlab_core::ActionId;
use brewlab_game::{Event, GameDriver, Phase};
use brewlab_records::{JsonlRecordStore, RecordSource};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 12, 14, 0, 0).unwrap() + Duration::seconds(secs)
}

fn tutorial() -> Vec<Event> {
    vec![
        Event::StartTutorial {
            participant_id: "P-42".to_string(),
        },
        Event::EditDraft {
            text: "Everything looks good".to_string(),
        },
        Event::ContinueTutorial { action: None },
        Event::EditDraft {
            text: "pH is crashing".to_string(),
        },
        Event::ContinueTutorial { action: None },
        Event::ToggleAi,
        Event::CopyAiToDraft,
        Event::ContinueTutorial {
            action: Some(ActionId::Sterilize),
        },
        Event::FinishTutorial,
    ]
}

fn round(draft: &str, action: ActionId, difficulty: u8) -> Vec<Event> {
    vec![
        Event::EditDraft {
            text: draft.to_string(),
        },
        Event::SubmitRound {
            action: Some(action),
            difficulty: Some(difficulty),
        },
    ]
}

#[test]
fn test_session_to_completion_writes_log() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonlRecordStore::new(dir.path()).unwrap();
    let mut driver = GameDriver::new(store);

    let mut clock = 0;
    for event in tutorial() {
        clock += 5;
        driver.handle(event, at(clock)).unwrap();
    }
    assert_eq!(driver.session().phase(), Phase::Game);
    let tutorial_secs = driver.session().timings().tutorial_duration_secs;
    assert_eq!(tutorial_secs, 40.0);

    // A wasted round, an AI-assisted round, then the winning fix.
    let mut events = round("no idea, maybe infection", ActionId::Sterilize, 6);
    events.extend(vec![
        Event::EditDraft {
            text: "Temperature is way too high".to_string(),
        },
        Event::ToggleAi,
        Event::CopyAiToDraft,
        Event::SubmitRound {
            action: Some(ActionId::FixTemp),
            difficulty: Some(3),
        },
    ]);
    events.extend(round("yeast is dead", ActionId::PitchYeast, 2));
    for event in events {
        clock += 10;
        driver.handle(event, at(clock)).unwrap();
    }
    assert_eq!(driver.session().phase(), Phase::End);

    driver
        .handle(Event::SubmitFeedback { text: "Tough but fun".to_string() }, at(clock + 30))
        .unwrap();
    driver
        .handle(Event::SubmitFeedback { text: "duplicate".to_string() }, at(clock + 40))
        .unwrap();

    let rounds = driver.sink().load_rounds().unwrap();
    assert_eq!(rounds.len(), 4);

    let numbers: Vec<u64> = rounds.iter().map(|r| r["round"].as_u64().unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    let batches: Vec<u64> = rounds.iter().map(|r| r["batch_num"].as_u64().unwrap()).collect();
    assert_eq!(batches, vec![3, 4, 5, 5]);

    assert_eq!(rounds[0]["scenario_id"], 6);
    assert_eq!(rounds[0]["action"], "Sterilize Equipment");
    assert_eq!(rounds[1]["ai_used"], true);
    assert_eq!(rounds[1]["text_changed"], true);
    assert_eq!(rounds[2]["scenario_id"], 3);
    assert_eq!(rounds[3]["action"], "None");
    assert_eq!(rounds[3]["user_assessment_final"], "COMPLETED");
    assert_eq!(rounds[0]["tutorial_duration_seconds"], 40.0);

    let feedback = driver.sink().load_feedback().unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0]["feedback_text"], "Tough but fun");
    assert_eq!(feedback[0]["prolific_id"], "P-42");
}

#[test]
fn test_validation_error_then_retry() {
    let dir = tempfile::tempdir().unwrap();
    let mut driver = GameDriver::new(JsonlRecordStore::new(dir.path()).unwrap());
    for event in tutorial() {
        driver.handle(event, at(0)).unwrap();
    }

    let err = driver
        .handle(
            Event::SubmitRound {
                action: Some(ActionId::FixTemp),
                difficulty: None,
            },
            at(5),
        )
        .unwrap_err();
    assert!(err.to_string().contains("assessment"));
    assert!(err.to_string().contains("difficulty"));
    assert!(driver.sink().load_rounds().unwrap().is_empty());

    for event in round("too warm", ActionId::FixTemp, 4) {
        driver.handle(event, at(8)).unwrap();
    }
    let rounds = driver.sink().load_rounds().unwrap();
    assert_eq!(rounds.len(), 1);
    assert_eq!(rounds[0]["round_duration_seconds"], 8.0);
    assert_eq!(driver.session().round(), 2);
}
