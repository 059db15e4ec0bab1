//! Streaming ask sessions: events, cancellation and callback delivery.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{BoxStream, FusedStream, Stream, StreamExt};
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture, WaitForCancellationFutureOwned};
use tracing::debug;

use crate::client::ClientError;
use crate::sse::SseFrame;

/// Event delivered to a streaming consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of the answer
    Message(String),
    /// The server sent its completion sentinel
    Complete,
}

impl From<SseFrame> for StreamEvent {
    fn from(frame: SseFrame) -> Self {
        match frame {
            SseFrame::Data(chunk) => StreamEvent::Message(chunk),
            SseFrame::Done => StreamEvent::Complete,
        }
    }
}

/// Cancels a streaming session. Cheap to clone; every clone controls the
/// same session, and cancelling more than once has no further effect.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the session is cancelled.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    fn cancelled_owned(&self) -> WaitForCancellationFutureOwned {
        self.token.clone().cancelled_owned()
    }
}

/// Lazy, cancellable sequence of events for one streaming ask.
///
/// Single pass and not restartable. At most one `Err` is yielded and nothing
/// follows it; once cancelled the stream ends, even while a read is pending.
/// Dropping it drops the underlying response and closes the connection.
pub struct AskStream {
    inner: BoxStream<'static, Result<StreamEvent, ClientError>>,
    cancel: CancelHandle,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    finished: bool,
}

impl AskStream {
    pub fn new<S>(inner: S) -> Self
    where
        S: Stream<Item = Result<StreamEvent, ClientError>> + Send + 'static,
    {
        let cancel = CancelHandle::new();
        let cancelled = Box::pin(cancel.cancelled_owned());
        Self {
            inner: inner.boxed(),
            cancel,
            cancelled,
            finished: false,
        }
    }

    /// Handle that cancels this stream from anywhere.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for AskStream {
    type Item = Result<StreamEvent, ClientError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.finished {
            return Poll::Ready(None);
        }

        // Polled first so a later cancel wakes a pending read.
        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.finished = true;
            return Poll::Ready(None);
        }

        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finished = true;
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

impl FusedStream for AskStream {
    fn is_terminated(&self) -> bool {
        self.finished
    }
}

/// Receives the events of a callback-driven session.
///
/// Methods run on the session's task, in the order the lines arrived.
pub trait AskHandler: Send + 'static {
    fn on_message(&mut self, chunk: String);
    fn on_error(&mut self, message: String);
    fn on_complete(&mut self);
}

/// [`AskHandler`] built from three closures, see [`handler_fn`].
pub struct FnHandler<M, E, C> {
    on_message: M,
    on_error: E,
    on_complete: C,
}

/// Build a handler from closures.
///
/// # Example
/// ```ignore
/// let session = client.stream_ask(
///     request,
///     handler_fn(
///         |chunk| print!("{}", chunk),
///         |err| eprintln!("failed: {}", err),
///         || println!(),
///     ),
/// );
/// ```
pub fn handler_fn<M, E, C>(on_message: M, on_error: E, on_complete: C) -> FnHandler<M, E, C>
where
    M: FnMut(String) + Send + 'static,
    E: FnMut(String) + Send + 'static,
    C: FnMut() + Send + 'static,
{
    FnHandler {
        on_message,
        on_error,
        on_complete,
    }
}

impl<M, E, C> AskHandler for FnHandler<M, E, C>
where
    M: FnMut(String) + Send + 'static,
    E: FnMut(String) + Send + 'static,
    C: FnMut() + Send + 'static,
{
    fn on_message(&mut self, chunk: String) {
        (self.on_message)(chunk)
    }

    fn on_error(&mut self, message: String) {
        (self.on_error)(message)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

/// A callback-driven streaming ask in flight.
pub struct StreamSession {
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl StreamSession {
    /// Stop delivering callbacks. Safe to call at any time and any number of
    /// times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A detached handle for cancelling from elsewhere, e.g. inside a callback.
    pub fn canceller(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait until the session has ended. A panic raised by the handler is
    /// resumed here.
    pub async fn wait(self) {
        if let Err(err) = self.task.await {
            if err.is_panic() {
                std::panic::resume_unwind(err.into_panic());
            }
        }
    }
}

/// Drive `stream` on a new tokio task, delivering its events to `handler`.
///
/// `on_error` fires at most once and never after `on_complete`; no callback
/// fires once the session is cancelled.
pub fn spawn_session<H: AskHandler>(mut stream: AskStream, mut handler: H) -> StreamSession {
    let cancel = stream.cancel_handle();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut completed = false;

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                item = stream.next() => item,
            };

            let Some(item) = next else { break };
            if token.is_cancelled() {
                break;
            }

            match item {
                Ok(StreamEvent::Message(chunk)) => handler.on_message(chunk),
                Ok(StreamEvent::Complete) => {
                    completed = true;
                    handler.on_complete();
                }
                Err(err) if completed => {
                    debug!(error = %err, "stream failed after completion, ignoring");
                    break;
                }
                Err(err) => {
                    handler.on_error(err.user_message());
                    break;
                }
            }
        }

        debug!(cancelled = token.is_cancelled(), "stream session finished");
    });

    StreamSession { cancel, task }
}
