//! Core client traits and error types.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::model::{ChatRequest, SearchRequest, SmartAskResponse, UploadResponse, VideoResponse};
use crate::stream::{spawn_session, AskHandler, AskStream, StreamSession};

/// Fallback text used when a transport failure carries no message.
pub const FALLBACK_ERROR_MESSAGE: &str = "connection failed";

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The server answered outside the 2xx range.
    #[error("HTTP {0}")]
    Status(u16),

    #[error("No response body")]
    NoBody,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Message handed to `AskHandler::on_error`.
    ///
    /// Transport failures report the underlying message, falling back to
    /// [`FALLBACK_ERROR_MESSAGE`] when it is blank.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(e) => {
                let message = e.to_string();
                if message.trim().is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    message
                }
            }
            other => other.to_string(),
        }
    }
}

/// Request/response operations of the video analysis service.
///
/// Every call is exactly one exchange with the server: no retries and no
/// authentication headers.
#[async_trait]
pub trait VideoClient: Send + Sync {
    /// Upload a subtitle file as multipart form data.
    async fn upload(&self, file_name: &str, content: Bytes) -> Result<UploadResponse, ClientError>;

    /// Ask the server for its built-in sample subtitle.
    async fn sample_subtitle(&self) -> Result<UploadResponse, ClientError>;

    /// Summarize the given subtitle text.
    async fn summarize(&self, subtitle_content: &str) -> Result<VideoResponse, ClientError>;

    /// Answer a question about the subtitle text.
    async fn chat(&self, request: &ChatRequest) -> Result<VideoResponse, ClientError>;

    /// Extract knowledge concepts. The concept list is JSON inside `content`,
    /// see [`VideoResponse::concepts`].
    async fn extract_concepts(&self, subtitle_content: &str)
        -> Result<VideoResponse, ClientError>;

    /// Extract notable quotes.
    async fn extract_quotes(&self, subtitle_content: &str) -> Result<VideoResponse, ClientError>;

    /// Search the subtitle text for a keyword.
    async fn search_keyword(&self, request: &SearchRequest) -> Result<VideoResponse, ClientError>;

    /// Ask with server-side intent classification. With `debug` set the
    /// response also carries the detected intent and its confidence.
    async fn smart_ask(
        &self,
        request: &ChatRequest,
        debug: bool,
    ) -> Result<SmartAskResponse, ClientError>;
}

/// Extension trait for the streaming ask endpoint.
///
/// Implementors only provide [`ask_stream`](Self::ask_stream); the callback
/// flavour is driven on top of it.
pub trait StreamingVideoClient: VideoClient {
    /// Open a lazy, cancellable stream of events for one question.
    ///
    /// Nothing is sent until the stream is first polled.
    fn ask_stream(&self, request: ChatRequest) -> AskStream;

    /// Start a streaming ask and deliver its events to `handler`.
    ///
    /// Returns immediately; the request runs on a spawned tokio task, so this
    /// must be called from within a tokio runtime. Cancelling the returned
    /// session suppresses every later callback.
    fn stream_ask<H: AskHandler>(&self, request: ChatRequest, handler: H) -> StreamSession {
        spawn_session(self.ask_stream(request), handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_contains_code() {
        assert_eq!(ClientError::Status(500).user_message(), "HTTP 500");
    }

    #[test]
    fn test_no_body_message() {
        assert_eq!(ClientError::NoBody.user_message(), "No response body");
    }

    #[test]
    fn test_config_message() {
        let err = ClientError::Config("bad proxy".into());
        assert_eq!(err.user_message(), "Configuration error: bad proxy");
    }
}
