//! Streaming ask against a running video agent service.
//!
//! Run with:
//! ```bash
//! export VIDEO_AGENT_BASE_URL="http://localhost:8080/api"
//! RUST_LOG=video_agent_client=debug cargo run --example stream_ask -- "这节课讲了什么？"
//! ```
//!
//! Press Ctrl-C to cancel the stream.

use std::io::Write;

use tracing_subscriber::EnvFilter;
use video_agent_client::{
    handler_fn, ChatRequest, StreamingVideoClient, VideoAgentClient, VideoClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Summarize the key points.".to_string());

    let client = VideoAgentClient::from_env()?;

    // The server hands out a sample subtitle when given an empty body
    let sample = client.sample_subtitle().await?;
    let subtitle = sample.content.unwrap_or_default();
    println!("Loaded {} characters of subtitle\n", subtitle.chars().count());

    let session = client.stream_ask(
        ChatRequest::new(subtitle, question),
        handler_fn(
            |chunk| {
                print!("{}", chunk);
                let _ = std::io::stdout().flush();
            },
            |err| eprintln!("\nError in stream: {}", err),
            || println!("\n\n=== Stream Complete ==="),
        ),
    );

    let canceller = session.canceller();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    session.wait().await;
    Ok(())
}
