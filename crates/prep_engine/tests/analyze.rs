use std::sync::{Arc, Mutex};

use prep_engine::{
    AnalyzeSettings, Analyzer, EngineEvent, EventSink, FailureKind, ReqwestAnalyzer, WireEvent,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self::default()
    }

    fn lines(&self) -> Vec<WireEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Line { event, .. } => Some(event.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings_for(server: &MockServer) -> AnalyzeSettings {
    AnalyzeSettings {
        server_url: server.uri(),
        ..AnalyzeSettings::default()
    }
}

async fn mount_body(server: &MockServer, date: &str, body: &str) {
    Mock::given(method("POST"))
        .and(path("/api/analyze-meetings"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "date": date })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn posts_date_and_streams_events_in_order() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"type\":\"calendar_status\",\"content\":\"Connecting to Google Calendar MCP...\"}\n",
        "{\"type\":\"calendar_parser_status\",\"content\":\"Analyzing Your Calendar...\"}\n",
        "{\"type\":\"company_event\",\"content\":\"Acme @ 10:00 AM\"}\n",
        "{\"type\":\"react_status\",\"content\":\"Searching...\"}\n",
        "{\"type\":\"markdown_formatter_status\",\"content\":\"Formatting...\"}\n",
        "{\"type\":\"streaming\",\"content\":\"## Acme\"}\n",
        "not-json\n",
        "{\"type\":\"streaming\",\"content\":\" @ 10:00 AM\"}\n",
    );
    mount_body(&server, "April 5, 2024", body).await;

    let analyzer = ReqwestAnalyzer::new(settings_for(&server)).expect("client");
    let sink = TestSink::new();
    let summary = analyzer
        .analyze(1, "April 5, 2024", &sink, &CancellationToken::new())
        .await
        .expect("analysis ok");

    assert_eq!(summary.events, 7);
    assert_eq!(summary.skipped_lines, 1);
    assert_eq!(summary.bytes, body.len() as u64);

    let kinds: Vec<String> = sink.lines().into_iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![
            "calendar_status",
            "calendar_parser_status",
            "company_event",
            "react_status",
            "markdown_formatter_status",
            "streaming",
            "streaming",
        ]
    );
    let report: String = sink
        .lines()
        .into_iter()
        .filter(|e| e.event_type == "streaming")
        .map(|e| e.content)
        .collect();
    assert_eq!(report, "## Acme @ 10:00 AM");
}

#[tokio::test]
async fn unterminated_last_line_is_discarded_by_default() {
    let server = MockServer::start().await;
    mount_body(
        &server,
        "April 5, 2024",
        "{\"type\":\"streaming\",\"content\":\"a\"}\n{\"type\":\"streaming\",\"content\":\"b\"}",
    )
    .await;

    let analyzer = ReqwestAnalyzer::new(settings_for(&server)).expect("client");
    let sink = TestSink::new();
    let summary = analyzer
        .analyze(1, "April 5, 2024", &sink, &CancellationToken::new())
        .await
        .expect("analysis ok");

    assert!(summary.discarded_tail);
    assert_eq!(sink.lines(), vec![WireEvent::new("streaming", "a")]);
}

#[tokio::test]
async fn unterminated_last_line_is_parsed_when_flushing() {
    let server = MockServer::start().await;
    mount_body(
        &server,
        "April 5, 2024",
        "{\"type\":\"streaming\",\"content\":\"a\"}\n{\"type\":\"streaming\",\"content\":\"b\"}",
    )
    .await;

    let settings = AnalyzeSettings {
        flush_trailing_line: true,
        ..settings_for(&server)
    };
    let analyzer = ReqwestAnalyzer::new(settings).expect("client");
    let sink = TestSink::new();
    analyzer
        .analyze(1, "April 5, 2024", &sink, &CancellationToken::new())
        .await
        .expect("analysis ok");

    assert_eq!(
        sink.lines(),
        vec![
            WireEvent::new("streaming", "a"),
            WireEvent::new("streaming", "b"),
        ]
    );
}

#[tokio::test]
async fn server_error_status_fails_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-meetings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"detail\":\"boom\"}"))
        .mount(&server)
        .await;

    let analyzer = ReqwestAnalyzer::new(settings_for(&server)).expect("client");
    let sink = TestSink::new();
    let err = analyzer
        .analyze(9, "April 5, 2024", &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let settings = AnalyzeSettings {
        server_url: format!("http://127.0.0.1:{port}"),
        ..AnalyzeSettings::default()
    };

    let analyzer = ReqwestAnalyzer::new(settings).expect("client");
    let sink = TestSink::new();
    let err = analyzer
        .analyze(2, "April 5, 2024", &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
}

#[tokio::test]
async fn cancelled_before_response_reports_cancelled() {
    let server = MockServer::start().await;
    mount_body(&server, "April 5, 2024", "").await;

    let analyzer = ReqwestAnalyzer::new(settings_for(&server)).expect("client");
    let sink = TestSink::new();
    let token = CancellationToken::new();
    token.cancel();

    let err = analyzer
        .analyze(3, "April 5, 2024", &sink, &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Cancelled);
}
