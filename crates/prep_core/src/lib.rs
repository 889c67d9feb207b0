//! Meeting prep core: pure state machine and view-model helpers.
mod date;
mod effect;
mod event;
mod msg;
mod state;
mod update;
mod view_model;

pub use date::{format_long_date, parse_date_input};
pub use effect::Effect;
pub use event::{EventKind, StatusEvent};
pub use msg::Msg;
pub use state::{AppState, Phase, RequestId, GENERIC_ERROR_MESSAGE};
pub use update::update;
pub use view_model::{AppViewModel, StatusIndicator, COMPANY_EVENT_ICON};
