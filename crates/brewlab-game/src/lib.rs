//! brewlab-game: Session engine for the fermentation troubleshooting game.
//!
//! Walks a participant from login through the tutorial and the game rounds
//! to the end screen. Each submitted action moves the batch through the
//! scenario catalog until every cause is fixed. Round and feedback records
//! are handed to a [`RecordSink`]; a failing sink never stalls the game.

pub mod config;
pub mod error;
pub mod history;
pub mod resolver;
pub mod session;
pub mod tutorial;
pub mod types;

pub use config::GameConfig;
pub use error::GameError;
pub use session::{Phase, Session};
pub use types::{Event, HandleOutcome, SessionView, SideEffect};

use chrono::{DateTime, Utc};

use brewlab_records::RecordSink;

/// Drives one session at a time and executes its side effects.
pub struct GameDriver<S> {
    session: Session,
    sink: S,
    config: GameConfig,
}

impl<S: RecordSink> GameDriver<S> {
    /// Create a driver with a fresh session on the login screen.
    pub fn new(sink: S) -> Self {
        Self {
            session: Session::new(),
            sink,
            config: GameConfig::default(),
        }
    }

    /// Set a custom game configuration.
    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Discard the current session and start over on the login screen.
    pub fn restart(&mut self) {
        tracing::info!(previous = %self.session.id(), "Session reset");
        self.session = Session::new();
    }

    /// Apply one event, then write any records it produced.
    ///
    /// A rejected event returns the error and keeps the current session.
    /// Sink failures are logged and counted, never returned.
    pub fn handle(&mut self, event: Event, now: DateTime<Utc>) -> error::Result<HandleOutcome> {
        let (session, effects) = self.session.apply(event, now)?.into_parts();
        self.session = session;

        let mut outcome = HandleOutcome::default();
        for effect in &effects {
            let written = match effect {
                SideEffect::LogRound(record) => self.sink.append_round(record),
                SideEffect::LogFeedback(record) => self.sink.append_feedback(record),
            };
            match written {
                Ok(()) => outcome.logged += 1,
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.session.id(),
                        error = %e,
                        "Record sink write failed; continuing"
                    );
                    outcome.failed += 1;
                }
            }
        }

        Ok(outcome)
    }

    /// Snapshot of the current session for rendering.
    pub fn view(&self) -> SessionView {
        self.session.view(&self.config.exit_code)
    }
}
