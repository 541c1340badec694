//! Server-Sent Events (SSE) decoding.
//!
//! Chat-completions endpoints stream replies as `data:` lines separated by
//! blank lines. The response body is turned into an async reader with
//! `StreamReader`, framed into lines with `LinesCodec`, and the lines are
//! assembled into events here.

use std::io;
use std::io::Cursor;

use futures_util::stream::{self, Stream, StreamExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tokio_util::io::StreamReader;

use crate::InvocationError;

/// A single SSE event parsed from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// The `data:` payload; multiple data lines are joined with `\n`.
    pub data: String,
}

/// Collects `data:` lines until a blank line closes the event.
#[derive(Debug, Default)]
struct EventBuilder {
    data: String,
    has_data: bool,
}

impl EventBuilder {
    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        if let Some(data) = field(line, "data") {
            if self.has_data {
                self.data.push('\n');
            }
            self.data.push_str(data);
            self.has_data = true;
        }
        // event:, id:, retry: and `:` comments carry nothing we use
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(SseEvent {
            data: std::mem::take(&mut self.data),
        })
    }
}

fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn line_error(err: LinesCodecError) -> InvocationError {
    match err {
        LinesCodecError::Io(e) if e.kind() == io::ErrorKind::InvalidData => {
            InvocationError::Parse(format!("event stream is not valid UTF-8: {e}"))
        }
        LinesCodecError::Io(e) => InvocationError::Network(e.to_string()),
        LinesCodecError::MaxLineLengthExceeded => {
            InvocationError::Parse("event stream line too long".to_string())
        }
    }
}

/// Decode a byte stream (such as `reqwest::Response::bytes_stream`) into a
/// stream of SSE events.
///
/// A transport error is yielded once as `InvocationError::Network`, and a
/// body that is not valid UTF-8 as `InvocationError::Parse`; either ends the
/// stream.
pub fn sse_events<S, B, E>(bytes: S) -> impl Stream<Item = Result<SseEvent, InvocationError>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let chunks = bytes.map(|chunk| chunk.map(Cursor::new).map_err(io::Error::other));
    let lines = Box::pin(FramedRead::new(StreamReader::new(chunks), LinesCodec::new()));

    stream::unfold(
        (lines, Some(EventBuilder::default())),
        |(mut lines, mut builder)| async move {
            loop {
                let current = builder.as_mut()?;
                match lines.next().await {
                    Some(Ok(line)) => {
                        if let Some(event) = current.process_line(&line) {
                            return Some((Ok(event), (lines, builder)));
                        }
                    }
                    Some(Err(e)) => {
                        return Some((Err(line_error(e)), (lines, None)));
                    }
                    None => {
                        let event = current.dispatch()?;
                        return Some((Ok(event), (lines, None)));
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(d: &str) -> SseEvent {
        SseEvent {
            data: d.to_string(),
        }
    }

    async fn decode(chunks: Vec<&'static [u8]>) -> Vec<Result<SseEvent, InvocationError>> {
        let chunks = chunks.into_iter().map(Ok::<_, io::Error>);
        sse_events(stream::iter(chunks)).collect().await
    }

    async fn decode_ok(chunks: Vec<&'static [u8]>) -> Vec<SseEvent> {
        decode(chunks)
            .await
            .into_iter()
            .map(Result::unwrap)
            .collect()
    }

    #[tokio::test]
    async fn decodes_single_event() {
        let events = decode_ok(vec![&b"data: {\"a\":1}\n\n"[..]]).await;
        assert_eq!(events, vec![data("{\"a\":1}")]);
    }

    #[tokio::test]
    async fn reassembles_line_split_across_chunks() {
        let events = decode_ok(vec![&b"data: hel"[..], &b"lo\n"[..], &b"\n"[..]]).await;
        assert_eq!(events, vec![data("hello")]);
    }

    #[tokio::test]
    async fn handles_crlf_and_skips_event_names() {
        let events = decode_ok(vec![&b"event: message\r\ndata: x\r\n\r\n"[..]]).await;
        assert_eq!(events, vec![data("x")]);
    }

    #[tokio::test]
    async fn joins_multiple_data_lines() {
        let events = decode_ok(vec![&b"data: one\ndata: two\n\n"[..]]).await;
        assert_eq!(events, vec![data("one\ntwo")]);
    }

    #[tokio::test]
    async fn ignores_comments_and_empty_events() {
        let events = decode_ok(vec![&b": keep-alive\n\nid: 7\n\ndata:tight\n\n"[..]]).await;
        assert_eq!(events, vec![data("tight")]);
    }

    #[tokio::test]
    async fn flushes_unterminated_event_at_end() {
        let events = decode_ok(vec![&b"data: a\n\ndata: last"[..]]).await;
        assert_eq!(events, vec![data("a"), data("last")]);
    }

    #[tokio::test]
    async fn multibyte_char_split_across_chunks() {
        let bytes: &'static [u8] = "data: héllo\n\n".as_bytes();
        // split inside the two-byte 'é'
        let events = decode_ok(vec![&bytes[..8], &bytes[8..]]).await;
        assert_eq!(events, vec![data("héllo")]);
    }

    #[tokio::test]
    async fn events_across_chunk_boundaries() {
        let events = decode_ok(vec![
            &b"data: a\n\nda"[..],
            &b"ta: b\n\n"[..],
            &b"data: [DONE]"[..],
        ])
        .await;
        assert_eq!(events, vec![data("a"), data("b"), data("[DONE]")]);
    }

    #[tokio::test]
    async fn invalid_utf8_is_parse_error() {
        let events = decode(vec![
            &b"data: {\"choices\":[{\"delta\":{\"content\":\"a\xffb\"}}]}\n\n"[..],
            &b"data: never\n\n"[..],
        ])
        .await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], Err(InvocationError::Parse(_))));
    }

    #[tokio::test]
    async fn transport_error_ends_stream() {
        let chunks: Vec<Result<&'static [u8], io::Error>> = vec![
            Ok(&b"data: a\n\n"[..]),
            Err(io::Error::other("connection reset")),
            Ok(&b"data: never\n\n"[..]),
        ];
        let events: Vec<_> = sse_events(stream::iter(chunks)).collect().await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].as_ref().unwrap(), &data("a"));
        assert!(matches!(
            &events[1],
            Err(InvocationError::Network(msg)) if msg.contains("connection reset")
        ));
    }
}
