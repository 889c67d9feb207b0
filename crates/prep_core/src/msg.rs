use chrono::NaiveDate;

use crate::{RequestId, StatusEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a date. `None` means the picker was cleared.
    DateSelected(Option<NaiveDate>),
    /// User typed something that is not a date.
    DateInputRejected(String),
    /// One decoded line of the response stream.
    StreamEvent {
        request_id: RequestId,
        event: StatusEvent,
    },
    /// The response stream closed.
    StreamFinished { request_id: RequestId },
    /// Transport failure for a request.
    RequestFailed {
        request_id: RequestId,
        reason: String,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
