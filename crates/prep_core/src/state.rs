use chrono::NaiveDate;
use prep_logging::{prep_debug, prep_info};

use crate::view_model::{AppViewModel, StatusIndicator};
use crate::{format_long_date, EventKind, StatusEvent};

/// Generation token assigned to every date selection.
pub type RequestId = u64;

/// The only error text shown to the user, whatever the transport failure was.
pub const GENERIC_ERROR_MESSAGE: &str = "Error analyzing meetings. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Requesting,
    Streaming,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected_date: Option<NaiveDate>,
    phase: Phase,
    loading: bool,
    error: String,
    status: Option<EventKind>,
    company_events: Vec<String>,
    stream_content: String,
    active_request: Option<RequestId>,
    last_request_id: RequestId,
    input_hint: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            request_id: self.active_request,
            date_label: self.selected_date.map(format_long_date),
            loading: self.loading,
            error: (!self.error.is_empty()).then(|| self.error.clone()),
            status: self
                .status
                .as_ref()
                .filter(|kind| **kind != EventKind::CompanyEvent)
                .and_then(StatusIndicator::for_kind),
            company_events: self.company_events.clone(),
            report: (!self.stream_content.is_empty()).then(|| self.stream_content.clone()),
            empty_report: self.phase == Phase::Done && self.stream_content.is_empty(),
            input_hint: self.input_hint.clone(),
            dirty: self.dirty,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    /// Tag of the last status event, or "" when no indicator is set.
    pub fn status_type(&self) -> &str {
        self.status.as_ref().map_or("", EventKind::tag)
    }

    pub fn company_events(&self) -> &[String] {
        &self.company_events
    }

    pub fn stream_content(&self) -> &str {
        &self.stream_content
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.active_request
    }

    /// True while a request may still deliver events.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, Phase::Requesting | Phase::Streaming)
    }

    /// True once the latest request reached `Done` or `Failed`.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Done | Phase::Failed)
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn in_flight_request(&self) -> Option<RequestId> {
        if self.is_in_flight() {
            self.active_request
        } else {
            None
        }
    }

    pub(crate) fn accepts(&self, request_id: RequestId) -> bool {
        self.is_in_flight() && self.active_request == Some(request_id)
    }

    /// Reset every per-request field and allocate a fresh request id.
    pub(crate) fn begin_request(&mut self, date: NaiveDate) -> RequestId {
        self.last_request_id += 1;
        let request_id = self.last_request_id;

        self.selected_date = Some(date);
        self.phase = Phase::Requesting;
        self.loading = true;
        self.error.clear();
        self.stream_content.clear();
        self.status = None;
        self.company_events.clear();
        self.input_hint = None;
        self.active_request = Some(request_id);
        self.dirty = true;
        request_id
    }

    pub(crate) fn apply_event(&mut self, event: StatusEvent) {
        let StatusEvent { kind, content } = event;
        match kind {
            progress if progress.is_progress_status() => {
                self.status = Some(progress);
            }
            EventKind::CompanyEvent => {
                prep_info!("Company event received: {}", content);
                self.company_events.push(content);
            }
            EventKind::Streaming => {
                self.stream_content.push_str(&content);
            }
            other => {
                prep_debug!("Unknown event type: {}", other.tag());
                return;
            }
        }
        self.reconcile_streaming();
        self.dirty = true;
    }

    /// Once report content exists, dismiss the spinner and progress indicators.
    /// A company-event status survives.
    fn reconcile_streaming(&mut self) {
        if self.stream_content.is_empty() {
            return;
        }
        self.phase = Phase::Streaming;
        self.loading = false;
        if self.status != Some(EventKind::CompanyEvent) {
            self.status = None;
        }
    }

    pub(crate) fn finish(&mut self) {
        self.phase = Phase::Done;
        self.loading = false;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self) {
        self.phase = Phase::Failed;
        self.error = GENERIC_ERROR_MESSAGE.to_string();
        self.loading = false;
        self.dirty = true;
    }

    pub(crate) fn set_input_hint(&mut self, hint: String) {
        self.input_hint = Some(hint);
        self.dirty = true;
    }
}
