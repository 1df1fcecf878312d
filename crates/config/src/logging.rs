//! Logging settings read from the environment.

use crate::env::EnvReader;
use crate::source::EnvSource;
use foundation_ports::{LogFields, LogLevel};
use std::collections::BTreeMap;

/// Env var selecting the minimum log level.
pub const LOG_LEVEL_VAR: &str = "FOUNDATION_LOG_LEVEL";
/// Env var carrying static `key=value` fields added to every event.
pub const LOG_FIELDS_VAR: &str = "FOUNDATION_LOG_FIELDS";

/// Effective logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Minimum level that is emitted.
    pub level: LogLevel,
    /// Fields attached to every event.
    pub base_fields: BTreeMap<String, String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            base_fields: BTreeMap::new(),
        }
    }
}

impl LoggingSettings {
    /// Load settings, defaulting to `info` with no base fields.
    ///
    /// Unknown level names fall back to `warn`.
    #[must_use]
    pub fn from_env<S: EnvSource>(reader: &EnvReader<S>) -> Self {
        let level = reader
            .get_str(LOG_LEVEL_VAR, None)
            .map_or(LogLevel::Info, |name| LogLevel::from_name_or_warn(&name));
        let base_fields = reader.get_dict(LOG_FIELDS_VAR, None);
        Self { level, base_fields }
    }

    /// Base fields in the shape loggers accept.
    #[must_use]
    pub fn log_fields(&self) -> LogFields {
        self.base_fields
            .iter()
            .map(|(key, value)| {
                (
                    key.clone().into_boxed_str(),
                    serde_json::Value::String(value.clone()),
                )
            })
            .collect()
    }
}
