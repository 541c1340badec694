//! ModelInvoker implementation for OpenAiCompatClient (sync + streaming).

use async_trait::async_trait;
use futures_util::{future, Stream, StreamExt};
use tracing::debug;

use crate::streaming::sse_events;
use crate::{DeltaStream, Invocation, InvocationError, ModelInvoker, Turn};

use super::client::{
    parse_response, parse_stream_chunk, status_error, transport_error, OpenAiCompatClient,
    STREAM_DONE,
};

impl OpenAiCompatClient {
    async fn post(
        &self,
        transcript: &[Turn],
        stream: bool,
    ) -> Result<reqwest::Response, InvocationError> {
        let body = self.build_request_body(transcript, stream);

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &text));
        }
        Ok(response)
    }
}

/// Turn a completions SSE body into text deltas. The stream ends at the
/// `[DONE]` sentinel or when the body does; chunks with no text are dropped.
fn deltas<S, B, E>(bytes: S) -> DeltaStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    sse_events(bytes)
        .take_while(|event| future::ready(!matches!(event, Ok(e) if e.data.trim() == STREAM_DONE)))
        .filter_map(|event| {
            future::ready(match event {
                Ok(e) => parse_stream_chunk(&e.data).transpose(),
                Err(e) => Some(Err(e)),
            })
        })
        .boxed()
}

#[async_trait]
impl ModelInvoker for OpenAiCompatClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn invoke(&self, transcript: &[Turn]) -> Result<Invocation, InvocationError> {
        debug!(model = %self.config.model, turns = transcript.len(), "completion request");

        let response = self.post(transcript, false).await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| InvocationError::Parse(e.to_string()))?;

        let (final_output, usage) = parse_response(&json)?;

        let mut canonical_transcript = transcript.to_vec();
        canonical_transcript.push(Turn::assistant(final_output.clone()));

        Ok(Invocation {
            final_output,
            canonical_transcript,
            usage,
        })
    }

    async fn invoke_streaming(&self, transcript: &[Turn]) -> Result<DeltaStream, InvocationError> {
        debug!(model = %self.config.model, turns = transcript.len(), "streaming completion request");

        let response = self.post(transcript, true).await?;

        Ok(deltas(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use futures_util::stream;

    use super::*;

    fn chunk(content: &str) -> String {
        format!("data: {{\"choices\":[{{\"index\":0,\"delta\":{{\"content\":\"{content}\"}}}}]}}\n\n")
    }

    async fn collect(chunks: Vec<Result<String, io::Error>>) -> Vec<Result<String, InvocationError>> {
        deltas(stream::iter(chunks)).collect().await
    }

    #[tokio::test]
    async fn stops_at_done_and_drops_empty_chunks() {
        let role = r#"data: {"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#.to_string() + "\n\n";
        let finish =
            r#"data: {"choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#.to_string() + "\n\n";
        let out = collect(vec![
            Ok(role),
            Ok(chunk("Hel")),
            Ok(chunk("lo")),
            Ok(finish),
            Ok("data: [DONE]\n\n".to_string()),
            Ok(chunk("after")),
        ])
        .await;

        let out: Vec<String> = out.into_iter().map(Result::unwrap).collect();
        assert_eq!(out, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn body_ending_without_done_ends_cleanly() {
        let out = collect(vec![Ok(chunk("only"))]).await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_deref().unwrap(), "only");
    }

    #[tokio::test]
    async fn error_payload_mid_stream_is_api_error() {
        let out = collect(vec![
            Ok(chunk("partial")),
            Ok("data: {\"error\":{\"message\":\"quota exceeded\"}}\n\n".to_string()),
        ])
        .await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].as_deref().unwrap(), "partial");
        assert!(matches!(&out[1], Err(InvocationError::Api(msg)) if msg == "quota exceeded"));
    }

    #[tokio::test]
    async fn transport_error_is_network_error() {
        let out = collect(vec![
            Ok(chunk("partial")),
            Err(io::Error::other("connection reset")),
        ])
        .await;

        assert_eq!(out.len(), 2);
        assert!(matches!(&out[1], Err(InvocationError::Network(_))));
    }

    #[tokio::test]
    async fn invalid_utf8_is_parse_error() {
        let bytes: Vec<Result<&'static [u8], io::Error>> = vec![Ok(
            &b"data: {\"choices\":[{\"delta\":{\"content\":\"a\xffb\"}}]}\n\n"[..],
        )];
        let out: Vec<_> = deltas(stream::iter(bytes)).collect().await;

        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], Err(InvocationError::Parse(_))));
    }
}
