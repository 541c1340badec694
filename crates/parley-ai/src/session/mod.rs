//! Conversation session management.
//!
//! A `Session` owns one transcript and a handle to the model invoker.
//! Each turn is: append the user's text, then either run a synchronous
//! invocation (whose canonical transcript replaces the local one) or
//! pull a streamed reply (whose concatenated text is appended once the
//! stream is exhausted).

mod chat;
mod manager;
mod stream;
mod types;


pub use manager::Session;
pub use stream::StreamedTurn;
pub use types::{EmptyTurn, TurnOutcome, TurnState};
