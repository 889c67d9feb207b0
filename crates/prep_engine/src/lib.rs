//! Meeting prep engine: streaming analysis request and NDJSON decoding.
mod analyze;
mod engine;
mod ndjson;
mod stream;
mod types;

pub use analyze::{
    AnalyzeSettings, Analyzer, ReqwestAnalyzer, DEFAULT_ENDPOINT, DEFAULT_SERVER_URL,
};
pub use engine::{EngineError, EngineHandle};
pub use ndjson::{parse_line, LineError, LineResult, NdjsonDecoder};
pub use stream::{consume_stream, ChannelEventSink, EventSink};
pub use types::{AnalyzeError, EngineEvent, FailureKind, RequestId, StreamSummary, WireEvent};
