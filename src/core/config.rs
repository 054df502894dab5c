//! Logger configuration
//!
//! A configuration is an ordered list of [`SinkConfig`] entries. Each entry
//! becomes one level slot, addressed by its position. The textual form is a
//! JSON array or YAML sequence; a bare single object is accepted and treated
//! as a one-element list.
//!
//! ```yaml
//! - output: ["stdout", "logs/app.log"]
//!   maxsize: 10
//!   maxbackups: 5
//!   maxage: 30
//!   compress: true
//!   level: debug
//! ```

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One output group: destinations sharing a single level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// `stdout`, `stderr` or a file path
    #[serde(rename = "output", default)]
    pub outputs: Vec<String>,

    /// Megabytes before a file is rotated (0 selects the default)
    #[serde(rename = "maxsize", default)]
    pub max_size_mb: u64,

    /// Rotated files to keep (0 keeps all)
    #[serde(rename = "maxbackups", default)]
    pub max_backups: usize,

    /// Days to keep rotated files (0 disables age-based removal)
    #[serde(rename = "maxage", default)]
    pub max_age_days: u64,

    /// Gzip rotated files
    #[serde(default)]
    pub compress: bool,

    #[serde(default)]
    pub level: LogLevel,
}

impl SinkConfig {
    pub fn new(level: LogLevel) -> Self {
        Self {
            outputs: Vec::new(),
            max_size_mb: 0,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
            level,
        }
    }

    /// Single stdout destination at `Info`
    pub fn stdout() -> Self {
        Self::new(LogLevel::Info).with_output("stdout")
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.outputs.push(output.into());
        self
    }

    #[must_use]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_size_mb = megabytes;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn with_max_age_days(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Ordered list of sink groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoggerConfig {
    pub sinks: Vec<SinkConfig>,
}

impl LoggerConfig {
    pub fn new(sinks: Vec<SinkConfig>) -> Self {
        Self { sinks }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Parse a JSON array of entries, or a single JSON object
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(data)?;
        if value.is_array() {
            Self::from_entries(serde_json::from_value(value)?)
        } else {
            Ok(Self::new(vec![serde_json::from_value(value)?]))
        }
    }

    /// Parse a YAML sequence of entries, or a single YAML mapping. An empty
    /// document yields an empty configuration.
    pub fn from_yaml(data: &[u8]) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_slice(data)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        if value.is_sequence() {
            Self::from_entries(serde_yaml::from_value(value)?)
        } else {
            Ok(Self::new(vec![serde_yaml::from_value(value)?]))
        }
    }

    /// Load a configuration file, choosing the parser by suffix
    /// (`.json`, `.yaml`, `.yml`)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "config path is empty"));
        }

        let display = path.display().to_string();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let is_json = extension == "json";
        if !is_json && extension != "yaml" && extension != "yml" {
            return Err(LoggerError::unsupported_format(display));
        }

        let data = std::fs::read(path).map_err(|e| LoggerError::config_read(display, e))?;
        if is_json {
            Self::from_json(&data)
        } else {
            Self::from_yaml(&data)
        }
    }

    /// Render as a JSON array
    ///
    /// # Errors
    ///
    /// Fails if an entry's level cannot be read back from text
    pub fn to_json(&self) -> Result<String> {
        self.check_levels()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a YAML sequence; same restriction as [`LoggerConfig::to_json`]
    pub fn to_yaml(&self) -> Result<String> {
        self.check_levels()?;
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations a logger cannot be built from
    pub fn validate(&self) -> Result<()> {
        if self.sinks.is_empty() {
            return Err(LoggerError::config("LoggerConfig", "logger config is empty"));
        }
        for (idx, sink) in self.sinks.iter().enumerate() {
            if sink.outputs.iter().all(|o| o.trim().is_empty()) {
                return Err(LoggerError::config(
                    format!("sink #{}", idx),
                    "no output destination",
                ));
            }
        }
        self.check_levels()
    }

    fn check_levels(&self) -> Result<()> {
        match self.sinks.iter().position(|s| !s.level.is_configurable()) {
            Some(idx) => Err(LoggerError::config(
                format!("sink #{}", idx),
                format!("level {} cannot be used as a group level", self.sinks[idx].level),
            )),
            None => Ok(()),
        }
    }

    fn from_entries(entries: Vec<Option<SinkConfig>>) -> Result<Self> {
        let mut sinks = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.into_iter().enumerate() {
            let sink = entry.ok_or_else(|| {
                LoggerError::config(format!("sink #{}", idx), "logger config contains nil item")
            })?;
            sinks.push(sink);
        }
        Ok(Self::new(sinks))
    }
}

impl From<Vec<SinkConfig>> for LoggerConfig {
    fn from(sinks: Vec<SinkConfig>) -> Self {
        Self::new(sinks)
    }
}

impl From<SinkConfig> for LoggerConfig {
    fn from(sink: SinkConfig) -> Self {
        Self::new(vec![sink])
    }
}
