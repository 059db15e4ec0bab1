//! Server-Sent Events (SSE) stream processing.
//!
//! The ask endpoint frames every chunk as a `data:` line and signals logical
//! completion with a `[DONE]` payload:
//! ```text
//! data:Prompt engineering is
//!
//! data: the core skill
//!
//! data:[DONE]
//! ```
//!
//! Chunk boundaries on the wire line up with neither lines nor UTF-8 code
//! points, so [`SseDecoder`] buffers raw bytes and only decodes complete
//! lines.

use std::collections::VecDeque;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, trace};

use crate::client::ClientError;

/// Prefix of a payload-carrying line.
pub const DATA_PREFIX: &str = "data:";

/// Payload that marks the logical end of an answer.
pub const DONE_MARKER: &str = "[DONE]";

/// One meaningful SSE line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// Content payload, exactly as sent after `data:`
    Data(String),
    /// The `[DONE]` sentinel
    Done,
}

impl SseFrame {
    fn from_payload(payload: String) -> Self {
        if is_done_marker(&payload) {
            SseFrame::Done
        } else {
            SseFrame::Data(payload)
        }
    }
}

/// Incremental SSE line decoder.
///
/// Holds the bytes of an unterminated line between reads. A `\n` byte never
/// occurs inside a multi-byte UTF-8 sequence, so splitting on it before
/// decoding keeps code points whole regardless of how the body was chunked.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return the frames of every line it completed, in
    /// order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            frames.extend(decode_line(&self.buffer[start..end]));
            start = end + 1;
        }
        self.buffer.drain(..start);

        frames
    }

    /// Flush a final line that was never terminated by a newline.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }

    /// Number of buffered bytes still waiting for a line break.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line(line: &[u8]) -> Option<SseFrame> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX.as_bytes())?;
    // Invalid sequences become U+FFFD, as a browser TextDecoder would do.
    Some(SseFrame::from_payload(String::from_utf8_lossy(payload).into_owned()))
}

/// Turn a chunked byte stream into SSE frames.
///
/// Ends silently when the bytes run out; `[DONE]` is reported but does not
/// stop reading. A read error is yielded once and ends the stream.
pub fn sse_frames<S, E>(bytes: S) -> impl Stream<Item = Result<SseFrame, ClientError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    stream::unfold(
        (Box::pin(bytes), SseDecoder::new(), VecDeque::new(), false),
        |(mut bytes, mut decoder, mut pending, mut ended)| async move {
            loop {
                if let Some(frame) = pending.pop_front() {
                    return Some((Ok(frame), (bytes, decoder, pending, ended)));
                }

                if ended {
                    return None;
                }

                match bytes.next().await {
                    Some(Ok(chunk)) => {
                        trace!(len = chunk.len(), "sse chunk");
                        pending.extend(decoder.feed(&chunk));
                    }
                    Some(Err(e)) => {
                        ended = true;
                        return Some((Err(e.into()), (bytes, decoder, pending, ended)));
                    }
                    None => {
                        debug!(leftover = decoder.pending(), "sse body ended");
                        ended = true;
                        pending.extend(decoder.finish());
                    }
                }
            }
        },
    )
}

/// Extension trait for `reqwest::Response` to read its body as SSE frames.
///
/// # Example
/// ```ignore
/// use video_agent_client::sse::SseResponseExt;
///
/// let response = client.post(url).json(&request).send().await?;
/// let mut frames = response.sse();
/// while let Some(frame) = frames.next().await {
///     println!("{:?}", frame?);
/// }
/// ```
pub trait SseResponseExt {
    fn sse(self) -> impl Stream<Item = Result<SseFrame, ClientError>> + Send;
}

impl SseResponseExt for reqwest::Response {
    fn sse(self) -> impl Stream<Item = Result<SseFrame, ClientError>> + Send {
        sse_frames(self.bytes_stream())
    }
}

/// Extract the payload of a `data:` line. The payload is not trimmed.
///
/// # Example
/// ```
/// use video_agent_client::sse::parse_sse_line;
///
/// assert_eq!(parse_sse_line("data:hello"), Some("hello"));
/// assert_eq!(parse_sse_line("data: hello"), Some(" hello"));
/// assert_eq!(parse_sse_line("event: error"), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}

/// Check if an SSE payload is the completion sentinel.
///
/// # Example
/// ```
/// use video_agent_client::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker(" [DONE]"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == DONE_MARKER
}
