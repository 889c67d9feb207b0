use std::path::PathBuf;

use clap::Parser;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = ".meeting_prep.ron";

/// Prepare for the day's external meetings from the terminal.
#[derive(Debug, Parser)]
#[command(name = "meeting-prep", version, about)]
pub struct Cli {
    /// Analyze this date and exit (2024-04-05, "April 5, 2024", today, tomorrow).
    #[arg(long)]
    pub date: Option<String>,

    /// Base URL of the analysis server.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// RON configuration file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Where log records go.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Parse an unterminated last line of the response instead of dropping it.
    #[arg(long)]
    pub flush_trailing_line: bool,

    /// Disable ANSI colours.
    #[arg(long)]
    pub no_color: bool,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}
