//! Line-oriented chat loop: the terminal front end for a session.

use std::io::Write;

use parley_ai::{Role, Session, TurnOutcome};
use parley_config::ParleyConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Quit,
    Clear,
    History,
    /// Blank input; never reaches the session.
    Skip,
    Message(String),
}

pub(crate) fn parse_line(line: &str) -> Command {
    match line.trim() {
        "" => Command::Skip,
        "/quit" | "/exit" => Command::Quit,
        "/clear" => Command::Clear,
        "/history" => Command::History,
        _ => Command::Message(line.to_string()),
    }
}

/// Run the chat loop until `/quit` or end of input.
pub(crate) async fn run<R, W>(
    session: &mut Session,
    config: &ParleyConfig,
    input: R,
    mut out: W,
) -> parley_common::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let label = config.agent.name.as_str();
    if let Some(ref greeting) = config.agent.greeting {
        writeln!(out, "{label}: {greeting}")?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse_line(&line) {
            Command::Skip => continue,
            Command::Quit => break,
            Command::Clear => {
                session.clear();
                writeln!(out, "(history cleared)")?;
            }
            Command::History => print_history(session, label, &mut out)?,
            Command::Message(text) => {
                if session.append_user_turn(text).is_err() {
                    continue;
                }
                if config.chat.stream {
                    stream_reply(session, label, &mut out).await?;
                } else {
                    writeln!(out, "Thinking...")?;
                    let reply = session.run_turn_sync().await;
                    writeln!(out, "{label}: {reply}")?;
                }
            }
        }
    }

    Ok(())
}

async fn stream_reply<W: Write>(session: &mut Session, label: &str, out: &mut W) -> std::io::Result<()> {
    write!(out, "{label}: ")?;
    out.flush()?;

    let mut turn = session.run_turn_streamed();
    while let Some(delta) = turn.next_delta().await {
        // A failed turn's last fragment is the diagnostic; keep it off the
        // partial reply's line.
        if turn.outcome() == Some(TurnOutcome::Failed) && !turn.text().is_empty() {
            writeln!(out)?;
        }
        write!(out, "{delta}")?;
        out.flush()?;
    }
    writeln!(out)
}

fn print_history<W: Write>(session: &Session, label: &str, out: &mut W) -> std::io::Result<()> {
    for turn in session.transcript() {
        let who = match turn.role {
            Role::User => "You",
            Role::Assistant => label,
            Role::Tool => "tool",
        };
        writeln!(out, "[{who}] {}", turn.content)?;
    }
    Ok(())
}
