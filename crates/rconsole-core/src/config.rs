//! rconsole.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Host address used when no `[host].url` is configured.
pub const DEFAULT_HOST_URL: &str = "http://127.0.0.1:3000";

/// Health monitor tick period used when no `[monitor].interval` is configured.
pub const DEFAULT_MONITOR_INTERVAL: Duration = Duration::from_millis(1000);

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid host url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid {field} {value:?}: expected a non-zero duration like \"500ms\", \"2s\" or \"1m\"")]
    InvalidDuration { field: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub host: Option<HostConfig>,
    pub monitor: Option<MonitorConfig>,
    pub request: Option<RequestConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    /// Base URL of the host, e.g. `http://127.0.0.1:3000`.
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Tick period (e.g., "1s").
    pub interval: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Per-request timeout imposed by callers. Unset means wait indefinitely.
    pub timeout: Option<String>,
}

impl ConsoleConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ConsoleConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values and re-validate.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        interval: Option<String>,
        timeout: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = host {
            self.host.get_or_insert_with(HostConfig::default).url = Some(url);
        }
        if let Some(interval) = interval {
            self.monitor.get_or_insert_with(MonitorConfig::default).interval = Some(interval);
        }
        if let Some(timeout) = timeout {
            self.request.get_or_insert_with(RequestConfig::default).timeout = Some(timeout);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(self.host_url())?;

        if let Some(interval) = self.monitor.as_ref().and_then(|m| m.interval.as_deref()) {
            require_duration("monitor.interval", interval)?;
        }
        if let Some(timeout) = self.request.as_ref().and_then(|r| r.timeout.as_deref()) {
            require_duration("request.timeout", timeout)?;
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub fn host_url(&self) -> &str {
        self.host
            .as_ref()
            .and_then(|h| h.url.as_deref())
            .unwrap_or(DEFAULT_HOST_URL)
            .trim_end_matches('/')
    }

    pub fn monitor_interval(&self) -> Duration {
        self.monitor
            .as_ref()
            .and_then(|m| m.interval.as_deref())
            .and_then(parse_duration)
            .unwrap_or(DEFAULT_MONITOR_INTERVAL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request
            .as_ref()
            .and_then(|r| r.timeout.as_deref())
            .and_then(parse_duration)
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let uri: http::Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(&e.to_string()))?;
    if uri.scheme_str() != Some("http") {
        return Err(invalid("only http:// hosts are supported"));
    }
    if uri.authority().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(())
}

fn require_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match parse_duration(value) {
        Some(d) if !d.is_zero() => Ok(d),
        _ => Err(ConfigError::InvalidDuration {
            field,
            value: value.to_string(),
        }),
    }
}

/// Parse a duration string like "5s", "500ms", "1m". A bare number is seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
