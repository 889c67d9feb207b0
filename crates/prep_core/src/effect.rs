use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the streaming analysis request for the given date label.
    StartAnalysis {
        request_id: RequestId,
        date_label: String,
    },
    /// Stop reading a request that a newer date selection superseded.
    CancelAnalysis { request_id: RequestId },
}
