use std::time::Duration;

pub const TITLE: &str = "Your Meetings, Fully Prepared";
pub const DATE_PLACEHOLDER: &str = "Select a date to prep for";
pub const INPUT_PROMPT: &str = "Date (2024-04-05, April 5, 2024, today; q to quit) > ";
pub const LOADING_DOTS: &str = "● ● ●";
pub const EMPTY_REPORT: &str = "No meeting report was produced for this date.";
pub const RENDER_TICK: Duration = Duration::from_millis(75);
