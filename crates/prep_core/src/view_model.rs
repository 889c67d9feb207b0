use crate::{EventKind, Phase, RequestId};

/// Icon drawn next to every company-event banner.
pub const COMPANY_EVENT_ICON: &str = "🕒";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    /// Request the frame belongs to; `None` before the first date selection.
    pub request_id: Option<RequestId>,
    pub date_label: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub status: Option<StatusIndicator>,
    pub company_events: Vec<String>,
    /// Report body, present once any streaming content arrived.
    pub report: Option<String>,
    /// The stream closed without any report content.
    pub empty_report: bool,
    pub input_hint: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub kind: EventKind,
    pub icon: &'static str,
    pub label: &'static str,
}

impl StatusIndicator {
    pub fn for_kind(kind: &EventKind) -> Option<Self> {
        let (icon, label) = match kind {
            EventKind::CalendarStatus => ("📅", "Accessing calendar"),
            EventKind::CalendarParserStatus => ("⚙", "Processing data"),
            EventKind::ReactStatus => ("🔎", "Researching"),
            EventKind::CompanyEvent => (COMPANY_EVENT_ICON, ""),
            _ => return None,
        };
        Some(Self {
            kind: kind.clone(),
            icon,
            label,
        })
    }
}
