//! # video-agent-client
//!
//! Async Rust client for the video agent service: subtitle upload,
//! summaries, chat, concept and quote extraction, keyword search and a
//! streaming "smart ask" endpoint.
//!
//! ## Features
//! - Async-first, tokio compatible
//! - Trait-based client (`VideoClient`, `StreamingVideoClient`)
//! - Incremental Server-Sent Events decoding, independent of how the body
//!   is chunked
//! - Cancellable streams, consumed either as a `futures::Stream` or through
//!   callbacks
//!
//! ## Streaming
//!
//! The streaming ask comes in two flavours:
//!
//! 1. **`ask_stream`** returns an [`AskStream`], a lazy sequence of
//!    [`StreamEvent`]s that ends when the body ends, on the first error, or
//!    when cancelled.
//! 2. **`stream_ask`** drives the same stream on a tokio task and calls an
//!    [`AskHandler`]; it returns a [`StreamSession`] to cancel with.
//!
//! The `data:[DONE]` sentinel is reported as [`StreamEvent::Complete`] but
//! does not stop reading; the stream ends with the response body.
//!
//! ## Example
//! ```no_run
//! use futures::StreamExt;
//! use video_agent_client::{
//!     ChatRequest, ClientOptions, StreamEvent, StreamingVideoClient, VideoAgentClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VideoAgentClient::new(ClientOptions::new())?;
//!     let request = ChatRequest::new("1\n00:00:00,000 --> 00:00:05,000\nHello", "What is said?");
//!
//!     let mut stream = client.ask_stream(request);
//!     while let Some(event) = stream.next().await {
//!         match event? {
//!             StreamEvent::Message(chunk) => print!("{}", chunk),
//!             StreamEvent::Complete => println!(),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
pub mod model;
pub mod options;
pub mod providers;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{ClientError, StreamingVideoClient, VideoClient};
pub use model::{
    ChatRequest, Concept, SearchRequest, SmartAskResponse, UploadResponse, UserIntent,
    VideoResponse,
};
pub use options::ClientOptions;
pub use providers::VideoAgentClient;
pub use stream::{handler_fn, AskHandler, AskStream, CancelHandle, StreamEvent, StreamSession};
