//! Event vocabulary of the analysis stream.

/// Type tag of a stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    CalendarStatus,
    CalendarParserStatus,
    ReactStatus,
    /// Part of the vocabulary, but has no effect on the view.
    MarkdownFormatterStatus,
    CompanyEvent,
    Streaming,
    Unknown(String),
}

impl EventKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "calendar_status" => EventKind::CalendarStatus,
            "calendar_parser_status" => EventKind::CalendarParserStatus,
            "react_status" => EventKind::ReactStatus,
            "markdown_formatter_status" => EventKind::MarkdownFormatterStatus,
            "company_event" => EventKind::CompanyEvent,
            "streaming" => EventKind::Streaming,
            other => EventKind::Unknown(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            EventKind::CalendarStatus => "calendar_status",
            EventKind::CalendarParserStatus => "calendar_parser_status",
            EventKind::ReactStatus => "react_status",
            EventKind::MarkdownFormatterStatus => "markdown_formatter_status",
            EventKind::CompanyEvent => "company_event",
            EventKind::Streaming => "streaming",
            EventKind::Unknown(tag) => tag,
        }
    }

    /// Kinds that drive the transient progress indicator.
    pub fn is_progress_status(&self) -> bool {
        matches!(
            self,
            EventKind::CalendarStatus | EventKind::CalendarParserStatus | EventKind::ReactStatus
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub kind: EventKind,
    pub content: String,
}

impl StatusEvent {
    pub fn new(tag: &str, content: impl Into<String>) -> Self {
        Self {
            kind: EventKind::from_tag(tag),
            content: content.into(),
        }
    }
}
