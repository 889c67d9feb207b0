use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use prep_engine::{AnalyzeSettings, DEFAULT_ENDPOINT, DEFAULT_SERVER_URL};
use serde::{Deserialize, Serialize};

use super::cli::Cli;
use super::logging::LogDestination;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Settings read from `.meeting_prep.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server_url: String,
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: Option<u64>,
    pub flush_trailing_line: bool,
    pub log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            flush_trailing_line: false,
            log: LogDestination::File,
        }
    }
}

impl AppConfig {
    /// Read the config file. A missing file is `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        ron::from_str(&content)
            .map(Some)
            .map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            })
    }

    /// Command-line flags win over file values.
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        if cli.flush_trailing_line {
            self.flush_trailing_line = true;
        }
        self
    }

    pub fn analyze_settings(&self) -> AnalyzeSettings {
        AnalyzeSettings {
            server_url: self.server_url.clone(),
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            flush_trailing_line: self.flush_trailing_line,
        }
    }
}
