use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use suite_client::{run_stream, CancellationToken, ClientEvent, ClientSettings, EventSink, FailureKind};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn take(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Reduces events to comparable tags, dropping timestamps.
fn summarize(events: Vec<ClientEvent>) -> Vec<String> {
    events
        .into_iter()
        .map(|event| match event {
            ClientEvent::StreamOpened { submission } => format!("open {submission}"),
            ClientEvent::StreamLog { submission, line } => {
                format!("log {submission} #{} {}", line.sequence, line.text)
            }
            ClientEvent::StreamClosed { submission } => format!("closed {submission}"),
            ClientEvent::StreamFailed { submission, error } => {
                format!("failed {submission} {}", error.kind)
            }
            other => format!("unexpected {other:?}"),
        })
        .collect()
}

const BODY: &str = "event: log\ndata: init\n\n\
event: ping\ndata: keepalive\n\n\
event: log\ndata: parse\n\n\
event: progress\ndata: 50\n\n\
data: done\n\n";

#[tokio::test]
async fn stream_numbers_log_lines_and_drops_keepalives() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/9"))
        .and(header("accept", "text/event-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "text/event-stream"))
        .mount(&server)
        .await;

    let settings = ClientSettings::with_base_url(server.uri());
    let sink = TestSink::new();
    run_stream(&settings, 9, &sink, CancellationToken::new()).await;

    assert_eq!(
        summarize(sink.take()),
        vec![
            "open 9",
            "log 9 #0 init",
            "log 9 #1 parse",
            "log 9 #2 done",
            "closed 9",
        ]
    );
}

#[tokio::test]
async fn stream_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let settings = ClientSettings::with_base_url(server.uri());
    let sink = TestSink::new();
    let token = CancellationToken::new();
    run_stream(&settings, 4, &sink, token.clone()).await;

    let events = sink.take();
    assert_eq!(events.len(), 1);
    match &events[0] {
        ClientEvent::StreamFailed { submission, error } => {
            assert_eq!(*submission, 4);
            assert_eq!(error.kind, FailureKind::HttpStatus(404));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(token.is_cancelled(), "a failed stream counts as closed");
}

#[tokio::test]
async fn silent_server_times_out_as_stream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/events/6"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(BODY, "text/event-stream")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut settings = ClientSettings::with_base_url(server.uri());
    settings.stream_idle_timeout = Duration::from_millis(200);
    let sink = TestSink::new();
    let token = CancellationToken::new();
    let finished = tokio::time::timeout(
        Duration::from_secs(2),
        run_stream(&settings, 6, &sink, token.clone()),
    )
    .await;

    assert!(finished.is_ok(), "stream should give up on its own");
    assert_eq!(summarize(sink.take()), vec!["failed 6 timeout"]);
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn closed_stream_emits_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "text/event-stream"))
        .mount(&server)
        .await;

    let settings = ClientSettings::with_base_url(server.uri());
    let sink = TestSink::new();
    let token = CancellationToken::new();
    token.cancel();
    run_stream(&settings, 1, &sink, token).await;

    assert!(sink.take().is_empty());
}
