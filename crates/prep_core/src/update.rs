use prep_logging::{prep_debug, prep_info, prep_warn};

use crate::{format_long_date, AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DateSelected(None) => Vec::new(),
        Msg::DateSelected(Some(date)) => {
            let superseded = state.in_flight_request();
            let request_id = state.begin_request(date);
            let date_label = format_long_date(date);
            prep_info!("Date selected: {} (request {})", date_label, request_id);

            let mut effects = Vec::with_capacity(1 + usize::from(superseded.is_some()));
            if let Some(previous) = superseded {
                effects.push(Effect::CancelAnalysis {
                    request_id: previous,
                });
            }
            effects.push(Effect::StartAnalysis {
                request_id,
                date_label,
            });
            effects
        }
        Msg::DateInputRejected(input) => {
            state.set_input_hint(format!(
                "Could not read \"{}\" as a date. Try 2024-04-05, April 5, 2024 or today.",
                input.trim()
            ));
            Vec::new()
        }
        Msg::StreamEvent { request_id, event } => {
            if state.accepts(request_id) {
                state.apply_event(event);
            } else {
                prep_debug!(
                    "Dropping {} event from stale request {}",
                    event.kind.tag(),
                    request_id
                );
            }
            Vec::new()
        }
        Msg::StreamFinished { request_id } => {
            if state.accepts(request_id) {
                prep_info!("Request {} finished", request_id);
                state.finish();
            }
            Vec::new()
        }
        Msg::RequestFailed { request_id, reason } => {
            if state.accepts(request_id) {
                prep_warn!("Request {} failed: {}", request_id, reason);
                state.fail();
            } else {
                prep_debug!("Ignoring failure of stale request {}: {}", request_id, reason);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
