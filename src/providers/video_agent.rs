//! HTTP client for the video agent service.
//!
//! Implements [`VideoClient`] and [`StreamingVideoClient`] over the service's
//! `/api` endpoints.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{TryFutureExt, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::client::{ClientError, StreamingVideoClient, VideoClient};
use crate::http::{add_extra_headers, build_http_client, ensure_success, read_json};
use crate::model::{ChatRequest, SearchRequest, SmartAskResponse, UploadResponse, VideoResponse};
use crate::options::ClientOptions;
use crate::sse::SseResponseExt;
use crate::stream::{AskStream, StreamEvent};

const UPLOAD_PATH: &str = "/upload";
const SAMPLE_PATH: &str = "/upload/content";
const SUMMARIZE_PATH: &str = "/summarize";
const CHAT_PATH: &str = "/chat";
const EXTRACT_PATH: &str = "/extract";
const QUOTES_PATH: &str = "/quotes";
const SEARCH_PATH: &str = "/search";
const ASK_PATH: &str = "/ask";
const STREAM_ASK_PATH: &str = "/stream/ask";

/// Client for the video agent service.
#[derive(Debug, Clone)]
pub struct VideoAgentClient {
    options: ClientOptions,
    http: reqwest::Client,
}

impl VideoAgentClient {
    /// Create a client from explicit options.
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        let http = build_http_client(&options)?;
        Ok(Self { options, http })
    }

    /// Create a client configured from `VIDEO_AGENT_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientOptions::from_env()?)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.options.endpoint(path);
        debug!(url = %url, "POST");
        add_extra_headers(self.http.post(url), &self.options.extra_headers)
    }

    async fn post_text<T: DeserializeOwned>(&self, path: &str, body: &str) -> Result<T, ClientError> {
        let response = self
            .post(path)
            .header(CONTENT_TYPE, "text/plain")
            .body(body.to_string())
            .send()
            .await?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, request: RequestBuilder, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl VideoClient for VideoAgentClient {
    async fn upload(&self, file_name: &str, content: Bytes) -> Result<UploadResponse, ClientError> {
        let part = Part::bytes(content.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self.post(UPLOAD_PATH).multipart(form).send().await?;
        read_json(response).await
    }

    async fn sample_subtitle(&self) -> Result<UploadResponse, ClientError> {
        self.post_text(SAMPLE_PATH, "").await
    }

    async fn summarize(&self, subtitle_content: &str) -> Result<VideoResponse, ClientError> {
        self.post_text(SUMMARIZE_PATH, subtitle_content).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<VideoResponse, ClientError> {
        self.post_json(self.post(CHAT_PATH), request).await
    }

    async fn extract_concepts(
        &self,
        subtitle_content: &str,
    ) -> Result<VideoResponse, ClientError> {
        self.post_text(EXTRACT_PATH, subtitle_content).await
    }

    async fn extract_quotes(&self, subtitle_content: &str) -> Result<VideoResponse, ClientError> {
        self.post_text(QUOTES_PATH, subtitle_content).await
    }

    async fn search_keyword(&self, request: &SearchRequest) -> Result<VideoResponse, ClientError> {
        self.post_json(self.post(SEARCH_PATH), request).await
    }

    async fn smart_ask(
        &self,
        request: &ChatRequest,
        debug: bool,
    ) -> Result<SmartAskResponse, ClientError> {
        let mut req = self.post(ASK_PATH);
        if debug {
            req = req.query(&[("debug", "true")]);
        }
        self.post_json(req, request).await
    }
}

impl StreamingVideoClient for VideoAgentClient {
    fn ask_stream(&self, request: ChatRequest) -> AskStream {
        let req = self.post(STREAM_ASK_PATH).header(CONTENT_TYPE, "application/json");

        let open = async move {
            let response = ensure_success(req.json(&request).send().await?)?;

            // A 204 carries no body to read from.
            if response.status() == StatusCode::NO_CONTENT {
                return Err(ClientError::NoBody);
            }

            debug!(status = response.status().as_u16(), "stream opened");
            Ok::<_, ClientError>(response.sse().map_ok(StreamEvent::from))
        };

        AskStream::new(open.try_flatten_stream())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_options() {
        let client = VideoAgentClient::new(
            ClientOptions::new().with_base_url("http://example.com/api".to_string()),
        )
        .unwrap();
        assert_eq!(client.options().endpoint(STREAM_ASK_PATH), "http://example.com/api/stream/ask");
    }

    #[test]
    fn test_new_rejects_bad_proxy() {
        let result = VideoAgentClient::new(ClientOptions::new().with_proxy("not a url".to_string()));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
