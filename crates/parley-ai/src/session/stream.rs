//! Streamed turns.

use futures_util::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{DeltaStream, InvocationError, Turn};

use super::manager::Session;
use super::types::{stream_diagnostic, TurnOutcome, TurnState};

enum Phase {
    /// Invocation not yet opened; nothing happens until the first pull.
    Pending,
    Open(DeltaStream),
    Done(TurnOutcome),
}

/// An in-flight streamed reply.
///
/// Pull fragments with [`next_delta`](Self::next_delta) until it returns
/// `None`. When the underlying stream ends cleanly, exactly one assistant
/// turn holding the concatenated fragments is appended to the session. If
/// the invocation fails, a single diagnostic fragment is yielded instead
/// and nothing is appended. Dropping the turn early also appends nothing.
///
/// The turn holds the session mutably, so no other turn can start while
/// it is alive.
pub struct StreamedTurn<'s> {
    session: &'s mut Session,
    phase: Phase,
    text: String,
}

impl Session {
    /// Start a streamed turn over the current transcript.
    ///
    /// Unlike [`run_turn_sync`](Self::run_turn_sync) this never reconciles
    /// with a canonical transcript from the invoker; only the locally
    /// concatenated text is kept.
    pub fn run_turn_streamed(&mut self) -> StreamedTurn<'_> {
        StreamedTurn {
            session: self,
            phase: Phase::Pending,
            text: String::new(),
        }
    }
}

impl<'s> StreamedTurn<'s> {
    /// Pull the next fragment. Empty fragments are skipped.
    pub async fn next_delta(&mut self) -> Option<String> {
        loop {
            match &mut self.phase {
                Phase::Done(_) => return None,
                Phase::Pending => {
                    self.session.transition(TurnState::Invoking);
                    let opened = {
                        let session = &*self.session;
                        session.invoker.invoke_streaming(&session.transcript).await
                    };
                    match opened {
                        Ok(deltas) => {
                            self.session.transition(TurnState::Streaming);
                            self.phase = Phase::Open(deltas);
                        }
                        Err(e) => return Some(self.fail(e)),
                    }
                }
                Phase::Open(deltas) => match deltas.next().await {
                    Some(Ok(delta)) => {
                        if delta.is_empty() {
                            continue;
                        }
                        self.text.push_str(&delta);
                        return Some(delta);
                    }
                    Some(Err(e)) => return Some(self.fail(e)),
                    None => {
                        self.complete();
                        return None;
                    }
                },
            }
        }
    }

    /// Text received so far. Not yet part of the transcript.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> TurnState {
        self.session.state
    }

    /// `Some` once the stream has ended, successfully or not.
    pub fn outcome(&self) -> Option<TurnOutcome> {
        match self.phase {
            Phase::Done(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Adapt into a `futures` stream of fragments. The commit rules are the
    /// same as for `next_delta`.
    pub fn into_stream(self) -> impl Stream<Item = String> + 's {
        stream::unfold(self, |mut turn| async move {
            let delta = turn.next_delta().await?;
            Some((delta, turn))
        })
    }

    fn complete(&mut self) {
        if self.session.log_turns {
            info!(session = %self.session.id.short(), "Assistant: {}", self.text);
        }
        self.session.transcript.push(Turn::assistant(self.text.clone()));
        self.session.finish_turn(TurnOutcome::Completed);
        self.phase = Phase::Done(TurnOutcome::Completed);
    }

    fn fail(&mut self, err: InvocationError) -> String {
        warn!(session = %self.session.id.short(), "streamed invocation failed: {err}");
        self.session.finish_turn(TurnOutcome::Failed);
        self.phase = Phase::Done(TurnOutcome::Failed);
        stream_diagnostic(&err)
    }
}

impl Drop for StreamedTurn<'_> {
    fn drop(&mut self) {
        if matches!(self.phase, Phase::Done(_)) {
            return;
        }
        // Abandoned mid-turn: nothing is committed.
        if matches!(self.phase, Phase::Open(_)) {
            debug!(
                session = %self.session.id.short(),
                received = self.text.len(),
                "streamed turn abandoned"
            );
        }
        if matches!(
            self.session.state,
            TurnState::Invoking | TurnState::Streaming
        ) {
            self.session.transition(TurnState::Idle);
        }
    }
}
