//! Turn lifecycle states.

use std::fmt;

/// Where the session is within the current turn.
///
/// `Idle → UserAppended → Invoking → [Streaming →] Completed | Failed → Idle`.
/// `Completed` and `Failed` are passed through on the way back to `Idle`;
/// the session remembers which one via `Session::last_outcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    UserAppended,
    Invoking,
    Streaming,
    Completed,
    Failed,
}

impl TurnState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: TurnState) -> bool {
        use TurnState::*;
        matches!(
            (self, next),
            (Idle, UserAppended)
                | (UserAppended, UserAppended)
                | (Idle | UserAppended, Invoking)
                | (Invoking, Streaming | Completed | Failed)
                | (Streaming, Completed | Failed | Idle)
                | (Invoking, Idle)
                | (Completed | Failed, Idle)
        )
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnState::Idle => "idle",
            TurnState::UserAppended => "user-appended",
            TurnState::Invoking => "invoking",
            TurnState::Streaming => "streaming",
            TurnState::Completed => "completed",
            TurnState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// How the most recent turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed,
    Failed,
}

impl From<TurnOutcome> for TurnState {
    fn from(outcome: TurnOutcome) -> Self {
        match outcome {
            TurnOutcome::Completed => TurnState::Completed,
            TurnOutcome::Failed => TurnState::Failed,
        }
    }
}

/// Returned when a user turn has no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("user turn must not be empty")]
pub struct EmptyTurn;

/// Assistant turn text shown when a synchronous invocation fails.
pub(crate) fn sync_diagnostic(err: &crate::InvocationError) -> String {
    format!("An error occurred: {err}")
}

/// Fragment yielded in place of further deltas when a stream fails.
pub(crate) fn stream_diagnostic(err: &crate::InvocationError) -> String {
    format!("Error: {err}")
}
