//! Session struct and transcript management.

use std::sync::Arc;

use parley_common::SessionId;
use tracing::{debug, warn};

use crate::token_tracker::TokenTracker;
use crate::{ModelInvoker, TokenUsage, Turn};

use super::types::{EmptyTurn, TurnOutcome, TurnState};

/// A conversation session: one transcript, one invoker.
pub struct Session {
    pub(super) id: SessionId,
    /// Ordered conversation history.
    pub(super) transcript: Vec<Turn>,
    pub(super) invoker: Arc<dyn ModelInvoker>,
    /// Synthetic first assistant turn, re-seeded on `clear`.
    pub(super) greeting: Option<String>,
    pub(super) state: TurnState,
    pub(super) last_outcome: Option<TurnOutcome>,
    pub(super) last_usage: Option<TokenUsage>,
    pub(super) tracker: TokenTracker,
    /// Log each exchange at info level.
    pub(super) log_turns: bool,
}

impl Session {
    pub fn new(invoker: Arc<dyn ModelInvoker>) -> Self {
        Self {
            id: SessionId::new(),
            transcript: Vec::new(),
            invoker,
            greeting: None,
            state: TurnState::Idle,
            last_outcome: None,
            last_usage: None,
            tracker: TokenTracker::new(),
            log_turns: false,
        }
    }

    /// Seed the transcript with a greeting as its first assistant turn.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        self.transcript.insert(0, Turn::assistant(greeting.clone()));
        self.greeting = Some(greeting);
        self
    }

    pub fn with_turn_logging(mut self, enabled: bool) -> Self {
        self.log_turns = enabled;
        self
    }

    /// Append `{user, text}` to the transcript. Existing turns are untouched.
    pub fn append_user_turn(&mut self, text: impl Into<String>) -> Result<(), EmptyTurn> {
        let text = text.into();
        if text.is_empty() {
            return Err(EmptyTurn);
        }
        if self.log_turns {
            tracing::info!(session = %self.id.short(), "User: {text}");
        }
        self.transcript.push(Turn::user(text));
        self.transition(TurnState::UserAppended);
        Ok(())
    }

    pub(super) fn transition(&mut self, next: TurnState) {
        if !self.state.can_transition_to(next) {
            warn!(session = %self.id.short(), from = %self.state, to = %next, "unexpected turn transition");
        }
        debug!(session = %self.id.short(), from = %self.state, to = %next, "turn state");
        self.state = next;
    }

    /// Close out the current turn, passing through its outcome state to `Idle`.
    pub(super) fn finish_turn(&mut self, outcome: TurnOutcome) {
        self.transition(outcome.into());
        self.last_outcome = Some(outcome);
        self.transition(TurnState::Idle);
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// The full conversation history.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn last_outcome(&self) -> Option<TurnOutcome> {
        self.last_outcome
    }

    /// Token usage reported by the last successful synchronous turn.
    pub fn last_usage(&self) -> Option<TokenUsage> {
        self.last_usage
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    pub fn model_name(&self) -> &str {
        self.invoker.model_name()
    }

    /// Drop all history, re-seeding the greeting if one was configured.
    pub fn clear(&mut self) {
        self.transcript.clear();
        if let Some(ref greeting) = self.greeting {
            self.transcript.push(Turn::assistant(greeting.clone()));
        }
        self.state = TurnState::Idle;
        self.last_outcome = None;
        self.last_usage = None;
        debug!(session = %self.id.short(), "history cleared");
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }
}
