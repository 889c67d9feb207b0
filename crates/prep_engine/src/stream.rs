use std::sync::mpsc;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use prep_logging::{prep_request_debug, prep_request_warn};
use tokio_util::sync::CancellationToken;

use crate::ndjson::{parse_line, LineResult, NdjsonDecoder};
use crate::{AnalyzeError, EngineEvent, RequestId, StreamSummary};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Read `stream` to exhaustion, emitting one `EngineEvent::Line` per valid line.
///
/// Malformed lines are logged and counted, never fatal. A chunk error ends the
/// read with that error. When `flush_trailing_line` is false an unterminated
/// final line is dropped.
pub async fn consume_stream<S, E>(
    request_id: RequestId,
    stream: S,
    flush_trailing_line: bool,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> Result<StreamSummary, AnalyzeError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<AnalyzeError>,
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = NdjsonDecoder::new();
    let mut summary = StreamSummary::default();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AnalyzeError::cancelled()),
            next = stream.next() => next,
        };
        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(Into::into)?;
        summary.bytes += chunk.len() as u64;
        prep_request_debug!(request_id, "chunk of {} bytes", chunk.len());

        for line in decoder.push_chunk(&chunk) {
            deliver(request_id, line, sink, &mut summary);
        }
    }

    match decoder.finish() {
        Some(tail) if flush_trailing_line => {
            deliver(request_id, parse_line(&tail), sink, &mut summary);
        }
        Some(tail) => {
            prep_request_debug!(
                request_id,
                "discarding unterminated trailing fragment ({} bytes)",
                tail.len()
            );
            summary.discarded_tail = true;
        }
        None => {}
    }

    Ok(summary)
}

fn deliver(
    request_id: RequestId,
    line: LineResult,
    sink: &dyn EventSink,
    summary: &mut StreamSummary,
) {
    match line {
        Ok(event) => {
            summary.events += 1;
            sink.emit(EngineEvent::Line { request_id, event });
        }
        Err(err) => {
            summary.skipped_lines += 1;
            prep_request_warn!(request_id, "Error parsing event: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bytes::Bytes;
    use futures_util::stream;
    use tokio_util::sync::CancellationToken;

    use super::{consume_stream, EventSink};
    use crate::{AnalyzeError, EngineEvent, FailureKind, WireEvent};

    #[derive(Default)]
    struct VecSink {
        events: Mutex<Vec<EngineEvent>>,
    }

    impl VecSink {
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

    impl EventSink for VecSink {
        fn emit(&self, event: EngineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn chunks(parts: &[&'static str]) -> Vec<Result<Bytes, std::io::Error>> {
        parts
            .iter()
            .map(|part| Ok(Bytes::from_static(part.as_bytes())))
            .collect()
    }

    #[tokio::test]
    async fn malformed_line_between_streaming_lines_is_skipped() {
        let sink = VecSink::default();
        let body = chunks(&[
            "{\"type\":\"streaming\",\"content\":\"## Hi\"}\nnot-",
            "json\n{\"type\":\"streaming\",\"content\":\" there\"}\n",
        ]);

        let summary = consume_stream(
            4,
            stream::iter(body),
            false,
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(summary.events, 2);
        assert_eq!(summary.skipped_lines, 1);
        assert!(!summary.discarded_tail);
        let text: String = sink.lines().into_iter().map(|e| e.content).collect();
        assert_eq!(text, "## Hi there");
    }

    #[tokio::test]
    async fn trailing_fragment_policy() {
        let parts = [
            "{\"type\":\"streaming\",\"content\":\"a\"}\n",
            "{\"type\":\"streaming\",\"content\":\"b\"}",
        ];

        let sink = VecSink::default();
        let summary = consume_stream(
            1,
            stream::iter(chunks(&parts)),
            false,
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(summary.discarded_tail);
        assert_eq!(sink.lines(), vec![WireEvent::new("streaming", "a")]);

        let sink = VecSink::default();
        let summary = consume_stream(
            1,
            stream::iter(chunks(&parts)),
            true,
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(!summary.discarded_tail);
        assert_eq!(summary.events, 2);
        assert_eq!(
            sink.lines(),
            vec![
                WireEvent::new("streaming", "a"),
                WireEvent::new("streaming", "b")
            ]
        );
    }

    #[tokio::test]
    async fn chunk_error_aborts_after_delivered_lines() {
        let sink = VecSink::default();
        let body: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"type\":\"react_status\",\"content\":\"x\"}\n")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];

        let err: AnalyzeError = consume_stream(
            2,
            stream::iter(body),
            false,
            &sink,
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind, FailureKind::Network);
        assert_eq!(sink.lines(), vec![WireEvent::new("react_status", "x")]);
    }

    #[tokio::test]
    async fn cancelled_token_stops_reading() {
        let sink = VecSink::default();
        let token = CancellationToken::new();
        token.cancel();

        let pending = stream::pending::<Result<Bytes, std::io::Error>>();
        let err = consume_stream(3, pending, false, &sink, &token)
            .await
            .unwrap_err();

        assert_eq!(err.kind, FailureKind::Cancelled);
        assert!(sink.lines().is_empty());
    }
}
