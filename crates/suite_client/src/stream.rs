use std::pin::pin;
use std::sync::Arc;

use chrono::Utc;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use suite_logging::{suite_debug, suite_trace, suite_warn};
use tokio_util::sync::CancellationToken;

use crate::settings::map_reqwest_error;
use crate::{
    ClientError, ClientEvent, ClientSettings, EventSink, FailureKind, LogLine, SubmissionId,
};

/// What an incoming server-sent event means to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedEvent {
    Log(String),
    /// Liveness only; never rendered.
    KeepAlive,
    Ignored,
}

/// Classifies an event by its SSE `event:` name. Unnamed events arrive as `message`.
pub fn decode_event(name: &str, data: &str) -> DecodedEvent {
    match name {
        "log" | "message" | "" => DecodedEvent::Log(data.to_string()),
        "ping" | "keepalive" | "keep-alive" => DecodedEvent::KeepAlive,
        _ => DecodedEvent::Ignored,
    }
}

/// The live connection for one submission. Closing is idempotent.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    submission: SubmissionId,
    cancel: CancellationToken,
}

impl StreamHandle {
    pub fn new(submission: SubmissionId) -> Self {
        Self {
            submission,
            cancel: CancellationToken::new(),
        }
    }

    pub fn submission(&self) -> SubmissionId {
        self.submission
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Holds at most one stream handle.
#[derive(Debug, Default)]
pub struct StreamSlot {
    current: Option<StreamHandle>,
}

impl StreamSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the held handle, then starts the next one with `open`.
    pub fn open_with(&mut self, open: impl FnOnce() -> StreamHandle) {
        self.close_current();
        self.current = Some(open());
    }

    /// Closes the held handle if it belongs to `submission`.
    pub fn close(&mut self, submission: SubmissionId) -> bool {
        match &self.current {
            Some(handle) if handle.submission() == submission => {
                self.close_current();
                true
            }
            _ => false,
        }
    }

    pub fn close_current(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.close();
        }
    }

    pub fn current(&self) -> Option<&StreamHandle> {
        self.current.as_ref()
    }

    pub fn open_count(&self) -> usize {
        self.current.iter().filter(|handle| !handle.is_closed()).count()
    }
}

/// Opens event streams on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct EventStreamConsumer {
    settings: ClientSettings,
}

impl EventStreamConsumer {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    /// Spawns the consumer task. Must be called from within a tokio runtime.
    pub fn open(&self, submission: SubmissionId, sink: Arc<dyn EventSink>) -> StreamHandle {
        let handle = StreamHandle::new(submission);
        let settings = self.settings.clone();
        let token = handle.token();
        tokio::spawn(async move {
            run_stream(&settings, submission, sink.as_ref(), token).await;
        });
        handle
    }
}

/// Drives one stream until it ends, fails, or `cancel` fires.
///
/// Nothing is emitted after a cancellation. A clean end of body reports
/// `StreamClosed`; any transport problem reports `StreamFailed`.
pub async fn run_stream(
    settings: &ClientSettings,
    submission: SubmissionId,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    let outcome = tokio::select! {
        _ = cancel.cancelled() => {
            suite_debug!("Event stream for submission {} closed", submission);
            return;
        }
        outcome = consume(settings, submission, sink) => outcome,
    };
    cancel.cancel();

    match outcome {
        Ok(()) => sink.emit(ClientEvent::StreamClosed { submission }),
        Err(error) => {
            suite_warn!("Event stream for submission {} failed: {}", submission, error);
            sink.emit(ClientEvent::StreamFailed { submission, error });
        }
    }
}

async fn consume(
    settings: &ClientSettings,
    submission: SubmissionId,
    sink: &dyn EventSink,
) -> Result<(), ClientError> {
    let url = settings.events_url(submission)?;
    let client = settings.build_client(false)?;
    let request = client.get(url).header(ACCEPT, "text/event-stream").send();
    let response = tokio::time::timeout(settings.stream_idle_timeout, request)
        .await
        .map_err(|_| ClientError::new(FailureKind::Timeout, "no response within idle timeout"))?
        .map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    sink.emit(ClientEvent::StreamOpened { submission });

    let mut events = pin!(response.bytes_stream().eventsource());
    let mut sequence = 0u64;
    loop {
        let next = tokio::time::timeout(settings.stream_idle_timeout, events.next())
            .await
            .map_err(|_| ClientError::new(FailureKind::Timeout, "no event within idle timeout"))?;
        let Some(event) = next else {
            return Ok(());
        };
        let event =
            event.map_err(|err| ClientError::new(FailureKind::Network, err.to_string()))?;

        match decode_event(&event.event, &event.data) {
            DecodedEvent::Log(text) => {
                sink.emit(ClientEvent::StreamLog {
                    submission,
                    line: LogLine {
                        sequence,
                        text,
                        received_at: Utc::now(),
                    },
                });
                sequence += 1;
            }
            DecodedEvent::KeepAlive => {
                suite_trace!("Keep-alive on stream {}", submission);
            }
            DecodedEvent::Ignored => {
                suite_debug!("Ignoring '{}' event on stream {}", event.event, submission);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_events() {
        assert_eq!(
            decode_event("log", "[INFO] planning"),
            DecodedEvent::Log("[INFO] planning".to_string())
        );
        assert_eq!(
            decode_event("message", "plain"),
            DecodedEvent::Log("plain".to_string())
        );
        assert_eq!(decode_event("ping", ""), DecodedEvent::KeepAlive);
        assert_eq!(decode_event("keepalive", "x"), DecodedEvent::KeepAlive);
        assert_eq!(decode_event("progress", "50"), DecodedEvent::Ignored);
    }

    #[test]
    fn handle_close_is_idempotent() {
        let handle = StreamHandle::new(3);
        assert!(!handle.is_closed());
        handle.close();
        handle.close();
        assert!(handle.is_closed());
    }

    #[test]
    fn slot_keeps_exactly_one_open_handle() {
        let mut slot = StreamSlot::new();
        let first = StreamHandle::new(1);
        slot.open_with(|| first.clone());
        assert_eq!(slot.open_count(), 1);

        let second = StreamHandle::new(2);
        slot.open_with(|| second.clone());
        assert!(first.is_closed());
        assert!(!second.is_closed());
        assert_eq!(slot.open_count(), 1);
        assert_eq!(slot.current().map(StreamHandle::submission), Some(2));
    }

    #[test]
    fn slot_closes_old_handle_before_opening_next() {
        let mut slot = StreamSlot::new();
        let first = StreamHandle::new(1);
        slot.open_with(|| first.clone());

        slot.open_with(|| {
            assert!(first.is_closed());
            StreamHandle::new(2)
        });
        assert_eq!(slot.open_count(), 1);
        assert_eq!(slot.current().map(StreamHandle::submission), Some(2));
    }

    #[test]
    fn slot_close_ignores_other_submissions() {
        let mut slot = StreamSlot::new();
        let handle = StreamHandle::new(2);
        slot.open_with(|| handle.clone());

        assert!(!slot.close(1));
        assert!(!handle.is_closed());
        assert!(slot.close(2));
        assert!(handle.is_closed());
        assert!(!slot.close(2));
        assert_eq!(slot.open_count(), 0);
    }
}
