use std::sync::{mpsc, Arc};

use prep_core::{Effect, Msg, StatusEvent};
use prep_engine::{AnalyzeSettings, EngineError, EngineEvent, EngineHandle, EventSink, FailureKind};
use prep_logging::{prep_debug, prep_info};

use super::app::LoopEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: AnalyzeSettings, tx: mpsc::Sender<LoopEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartAnalysis {
                    request_id,
                    date_label,
                } => {
                    prep_info!("StartAnalysis request_id={} date={}", request_id, date_label);
                    self.engine.start(request_id, date_label);
                }
                Effect::CancelAnalysis { request_id } => {
                    prep_debug!("CancelAnalysis request_id={}", request_id);
                    self.engine.cancel(request_id);
                }
            }
        }
    }
}

/// Feeds engine events into the app loop as core messages.
struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if let Some(msg) = map_engine_event(event) {
            let _ = self.tx.send(LoopEvent::Msg(msg));
        }
    }
}

/// Cancelled requests were superseded on purpose and produce no message.
fn map_engine_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Line { request_id, event } => Some(Msg::StreamEvent {
            request_id,
            event: StatusEvent::new(&event.event_type, event.content),
        }),
        EngineEvent::Finished { request_id, .. } => Some(Msg::StreamFinished { request_id }),
        EngineEvent::Failed { error, .. } if error.kind == FailureKind::Cancelled => None,
        EngineEvent::Failed { request_id, error } => Some(Msg::RequestFailed {
            request_id,
            reason: error.to_string(),
        }),
    }
}
