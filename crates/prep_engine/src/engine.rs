use std::sync::{mpsc, Arc};
use std::thread;

use prep_logging::{prep_debug, prep_request_debug, prep_request_info, prep_request_warn};
use tokio_util::sync::CancellationToken;

use crate::analyze::{AnalyzeSettings, Analyzer, ReqwestAnalyzer};
use crate::stream::EventSink;
use crate::{AnalyzeError, EngineEvent, FailureKind, RequestId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] AnalyzeError),
}

enum EngineCommand {
    Start {
        request_id: RequestId,
        date_label: String,
    },
    Cancel {
        request_id: RequestId,
    },
}

/// Handle to the background thread that runs analysis requests.
///
/// At most one request is read at a time; starting a new one cancels the
/// previous read loop. Every outcome is reported to the sink given at spawn.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: AnalyzeSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let analyzer = ReqwestAnalyzer::new(settings)?;
        Self::spawn(Arc::new(analyzer), sink)
    }

    pub fn spawn(
        analyzer: Arc<dyn Analyzer>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();

        thread::spawn(move || {
            let mut active: Option<(RequestId, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start {
                        request_id,
                        date_label,
                    } => {
                        if let Some((previous, token)) = active.take() {
                            prep_request_debug!(previous, "superseded by request {}", request_id);
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        active = Some((request_id, token.clone()));

                        let analyzer = analyzer.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            run_request(
                                analyzer.as_ref(),
                                sink.as_ref(),
                                request_id,
                                date_label,
                                token,
                            )
                            .await;
                        });
                    }
                    EngineCommand::Cancel { request_id } => match active.take() {
                        Some((current, token)) if current == request_id => {
                            prep_request_debug!(request_id, "cancel requested");
                            token.cancel();
                        }
                        other => active = other,
                    },
                }
            }
            prep_debug!("Engine command channel closed; shutting down runtime");
        });

        Ok(Self { cmd_tx })
    }

    pub fn start(&self, request_id: RequestId, date_label: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Start {
            request_id,
            date_label: date_label.into(),
        });
    }

    pub fn cancel(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel { request_id });
    }
}

async fn run_request(
    analyzer: &dyn Analyzer,
    sink: &dyn EventSink,
    request_id: RequestId,
    date_label: String,
    cancel: CancellationToken,
) {
    match analyzer.analyze(request_id, &date_label, sink, &cancel).await {
        Ok(summary) => {
            prep_request_info!(
                request_id,
                "stream closed: {} events, {} skipped lines, {} bytes",
                summary.events,
                summary.skipped_lines,
                summary.bytes
            );
            sink.emit(EngineEvent::Finished {
                request_id,
                summary,
            });
        }
        Err(error) => {
            if error.kind == FailureKind::Cancelled {
                prep_request_debug!(request_id, "read loop cancelled");
            } else {
                prep_request_warn!(request_id, "request failed: {}", error);
            }
            sink.emit(EngineEvent::Failed { request_id, error });
        }
    }
}
