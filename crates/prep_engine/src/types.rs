use std::fmt;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// One line of the response body as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub content: String,
}

impl WireEvent {
    pub fn new(event_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamSummary {
    /// Lines parsed and delivered to the sink.
    pub events: usize,
    /// Non-blank lines that were not valid events.
    pub skipped_lines: usize,
    pub bytes: u64,
    /// An unterminated last line was dropped at end of stream.
    pub discarded_tail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Line {
        request_id: RequestId,
        event: WireEvent,
    },
    Finished {
        request_id: RequestId,
        summary: StreamSummary,
    },
    Failed {
        request_id: RequestId,
        error: AnalyzeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct AnalyzeError {
    pub kind: FailureKind,
    pub message: String,
}

impl AnalyzeError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "request superseded")
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AnalyzeError::new(FailureKind::Timeout, err.to_string());
        }
        if err.is_builder() {
            return AnalyzeError::new(FailureKind::InvalidUrl, err.to_string());
        }
        AnalyzeError::new(FailureKind::Network, err.to_string())
    }
}

impl From<std::io::Error> for AnalyzeError {
    fn from(err: std::io::Error) -> Self {
        AnalyzeError::new(FailureKind::Network, err.to_string())
    }
}

impl From<url::ParseError> for AnalyzeError {
    fn from(err: url::ParseError) -> Self {
        AnalyzeError::new(FailureKind::InvalidUrl, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    Network,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}
