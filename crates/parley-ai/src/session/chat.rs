//! Synchronous turns.

use tracing::{info, warn};

use crate::Turn;

use super::manager::Session;
use super::types::{sync_diagnostic, TurnOutcome, TurnState};

impl Session {
    /// Send the whole transcript and wait for the reply.
    ///
    /// On success the invoker's canonical transcript replaces ours in full,
    /// picking up any turns it generated along the way. On failure the
    /// transcript is kept and a diagnostic assistant turn is appended, so
    /// the error shows up in the conversation. Either way the returned text
    /// is what the user should see.
    pub async fn run_turn_sync(&mut self) -> String {
        self.transition(TurnState::Invoking);

        match self.invoker.invoke(&self.transcript).await {
            Ok(invocation) => {
                self.tracker
                    .record(self.invoker.model_name(), &invocation.usage);
                self.last_usage = Some(invocation.usage);
                self.transcript = invocation.canonical_transcript;
                if self.log_turns {
                    info!(session = %self.id.short(), "Assistant: {}", invocation.final_output);
                }
                self.finish_turn(TurnOutcome::Completed);
                invocation.final_output
            }
            Err(e) => {
                warn!(session = %self.id.short(), "invocation failed: {e}");
                let diagnostic = sync_diagnostic(&e);
                self.transcript.push(Turn::assistant(diagnostic.clone()));
                self.finish_turn(TurnOutcome::Failed);
                diagnostic
            }
        }
    }
}
