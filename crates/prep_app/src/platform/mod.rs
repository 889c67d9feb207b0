mod app;
mod cli;
mod config;
mod effects;
mod input;
mod logging;
pub(crate) mod ui;

pub use app::run_app;
