use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use monitor_core::{endpoint_for_page, ClientSettings, EndpointError, LabelLayout};
use monitor_logging::monitor_info;
use serde::{Deserialize, Serialize};
use url::Url;

use super::logging::LogDestination;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILENAME: &str = "monitor.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Address of the status page; the socket endpoint is derived from it.
    pub page_url: Option<String>,
    pub tick_interval_ms: u64,
    pub percentage_precision: usize,
    pub value_column: usize,
    /// Width used until the terminal reports its own.
    pub initial_width: usize,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let layout = LabelLayout::default();
        Self {
            page_url: None,
            tick_interval_ms: 1000,
            percentage_precision: layout.percentage_precision,
            value_column: layout.value_column,
            initial_width: layout.width,
            log_destination: LogDestination::File,
            log_file: PathBuf::from("./monitor.log"),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub page_url: Option<String>,
    pub tick_interval_ms: Option<u64>,
    pub percentage_precision: Option<usize>,
    pub log_destination: Option<LogDestination>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("no page URL given; pass one on the command line or set `page_url`")]
    MissingPageUrl,
    #[error("invalid page URL {url:?}: {source}")]
    PageUrl {
        url: String,
        source: url::ParseError,
    },
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
}

/// Loads the configuration file.
///
/// An explicit `path` must exist. Without one, `monitor.ron` in the working
/// directory is used when present and defaults otherwise.
pub fn load(path: Option<&Path>) -> Result<MonitorConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            return Ok(MonitorConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    monitor_info!("Loaded configuration from {:?}", path);
    Ok(config)
}

impl MonitorConfig {
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(page_url) = overrides.page_url {
            self.page_url = Some(page_url);
        }
        if let Some(tick) = overrides.tick_interval_ms {
            self.tick_interval_ms = tick;
        }
        if let Some(precision) = overrides.percentage_precision {
            self.percentage_precision = precision;
        }
        if let Some(destination) = overrides.log_destination {
            self.log_destination = destination;
        }
        self
    }

    /// Resolves the page URL to a socket endpoint and builds client settings.
    pub fn client_settings(&self) -> Result<ClientSettings, ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        let raw = self.page_url.as_deref().ok_or(ConfigError::MissingPageUrl)?;
        let page = Url::parse(raw).map_err(|source| ConfigError::PageUrl {
            url: raw.to_string(),
            source,
        })?;
        let endpoint = endpoint_for_page(&page)?;

        Ok(ClientSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            layout: LabelLayout {
                width: self.initial_width,
                value_column: self.value_column,
                percentage_precision: self.percentage_precision,
            },
            ..ClientSettings::new(endpoint)
        })
    }
}
