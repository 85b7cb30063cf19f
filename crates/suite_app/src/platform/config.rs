use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use suite_client::ClientSettings;
use suite_logging::LogDestination;
use thiserror::Error;

pub(crate) const CONFIG_FILENAME: &str = "suite.ron";
pub(crate) const BASE_URL_ENV: &str = "SUITE_BASE_URL";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) base_url: String,
    pub(crate) connect_timeout_secs: u64,
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) stream_idle_timeout_secs: u64,
    pub(crate) max_attachment_bytes: u64,
    pub(crate) log_target: LogTarget,
}

impl Default for AppConfig {
    fn default() -> Self {
        let settings = ClientSettings::default();
        Self {
            base_url: settings.base_url,
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.map(|t| t.as_secs()),
            stream_idle_timeout_secs: settings.stream_idle_timeout.as_secs(),
            max_attachment_bytes: settings.max_attachment_bytes,
            log_target: LogTarget::default(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides; `lookup` is `std::env::var` outside tests.
    pub(crate) fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        self
    }

    pub(crate) fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            stream_idle_timeout: Duration::from_secs(self.stream_idle_timeout_secs),
            max_attachment_bytes: self.max_attachment_bytes,
            ..ClientSettings::default()
        }
    }

    pub(crate) fn log_destination(&self) -> LogDestination {
        match self.log_target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// First CLI argument, or `suite.ron` in the working directory.
pub(crate) fn config_path_from_args(mut args: impl Iterator<Item = String>) -> PathBuf {
    args.nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Reads the config file. A missing file is not an error and yields `None`.
pub(crate) fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
