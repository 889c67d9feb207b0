use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use prep_engine::{
    AnalyzeError, AnalyzeSettings, Analyzer, ChannelEventSink, EngineEvent, EngineHandle,
    EventSink, FailureKind, RequestId, StreamSummary, WireEvent,
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Echoes the date label as one streaming line; "slow" waits for cancellation.
struct ScriptedAnalyzer;

#[async_trait::async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        request_id: RequestId,
        date_label: &str,
        sink: &dyn EventSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, AnalyzeError> {
        if date_label == "slow" {
            cancel.cancelled().await;
            return Err(AnalyzeError::cancelled());
        }
        sink.emit(EngineEvent::Line {
            request_id,
            event: WireEvent::new("streaming", date_label),
        });
        Ok(StreamSummary {
            events: 1,
            ..StreamSummary::default()
        })
    }
}

fn scripted_engine() -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(tx));
    let engine = EngineHandle::spawn(Arc::new(ScriptedAnalyzer), sink).expect("engine");
    (engine, rx)
}

/// Collect events until `count` terminal events arrived or the deadline passed.
fn collect_terminal(rx: &mpsc::Receiver<EngineEvent>, count: usize) -> Vec<EngineEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    let mut terminal = 0;
    while terminal < count {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let Ok(event) = rx.recv_timeout(remaining) else {
            break;
        };
        if !matches!(event, EngineEvent::Line { .. }) {
            terminal += 1;
        }
        events.push(event);
    }
    events
}

#[test]
fn starting_a_new_request_cancels_the_previous_one() {
    let (engine, rx) = scripted_engine();
    engine.start(1, "slow");
    engine.start(2, "April 6, 2024");

    let events = collect_terminal(&rx, 2);
    assert!(events.iter().any(|event| matches!(
        event,
        EngineEvent::Failed { request_id: 1, error } if error.kind == FailureKind::Cancelled
    )));
    assert!(events.contains(&EngineEvent::Line {
        request_id: 2,
        event: WireEvent::new("streaming", "April 6, 2024"),
    }));
    assert!(events
        .iter()
        .any(|event| matches!(event, EngineEvent::Finished { request_id: 2, .. })));
}

#[test]
fn cancel_only_applies_to_the_active_request() {
    let (engine, rx) = scripted_engine();
    engine.start(1, "slow");
    engine.cancel(7);
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    engine.cancel(1);
    let events = collect_terminal(&rx, 1);
    assert!(matches!(
        events.as_slice(),
        [EngineEvent::Failed { request_id: 1, error }] if error.kind == FailureKind::Cancelled
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn engine_streams_from_http_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "{\"type\":\"react_status\",\"content\":\"x\"}\n{\"type\":\"streaming\",\"content\":\"## Hi\"}\n",
            "application/json",
        ))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let settings = AnalyzeSettings {
        server_url: server.uri(),
        ..AnalyzeSettings::default()
    };
    let engine = EngineHandle::new(settings, Arc::new(ChannelEventSink::new(tx))).expect("engine");
    engine.start(11, "April 5, 2024");

    let events = tokio::task::spawn_blocking(move || collect_terminal(&rx, 1))
        .await
        .unwrap();
    assert_eq!(events.len(), 3);
    assert_eq!(
        events[1],
        EngineEvent::Line {
            request_id: 11,
            event: WireEvent::new("streaming", "## Hi"),
        }
    );
    assert!(matches!(
        events[2],
        EngineEvent::Finished { request_id: 11, summary } if summary.events == 2
    ));
}
