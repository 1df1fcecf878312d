//! Structured logging boundary contract.

use foundation_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::fmt;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Debug.
    Debug,
    /// Info.
    Info,
    /// Warn.
    Warn,
    /// Error.
    Error,
    /// Critical.
    Critical,
}

impl LogLevel {
    /// Parse a level name (`debug`, `info`, `warn`/`warning`, `error`, `critical`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    /// Parse a level name, falling back to `Warn` for anything unrecognized.
    #[must_use]
    pub fn from_name_or_warn(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Self::Warn)
    }

    /// Lowercase level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Additional event fields.
pub type LogFields = BTreeMap<Box<str>, serde_json::Value>;

/// Structured log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Stable event name.
    pub event: Box<str>,
    /// Severity.
    pub level: LogLevel,
    /// Human-readable message (safe, redacted).
    pub message: Box<str>,
    /// Optional structured fields.
    pub fields: Option<LogFields>,
    /// Optional error payload.
    pub error: Option<serde_json::Value>,
}

impl LogEvent {
    /// Create an event without fields or error payload.
    #[must_use]
    pub fn new(level: LogLevel, event: &str, message: &str) -> Self {
        Self {
            event: event.to_owned().into_boxed_str(),
            level,
            message: message.to_owned().into_boxed_str(),
            fields: None,
            error: None,
        }
    }

    /// Attach structured fields, dropping an empty map.
    #[must_use]
    pub fn with_fields(mut self, fields: LogFields) -> Self {
        self.fields = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    /// Attach an error envelope (including its cause chain) as the error payload.
    #[must_use]
    pub fn with_error(mut self, error: &ErrorEnvelope) -> Self {
        self.error = serde_json::to_value(error).ok();
        self
    }

    /// Returns a field value by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.as_ref().and_then(|fields| fields.get(key))
    }
}

/// Boundary contract for structured logging.
pub trait LoggerPort: Send + Sync {
    /// Emit a structured event.
    fn log(&self, event: LogEvent);

    /// Create a child logger with base fields applied to every event.
    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort>;

    /// Convenience: debug event.
    fn debug(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            fields,
            ..LogEvent::new(LogLevel::Debug, event, message)
        });
    }

    /// Convenience: info event.
    fn info(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            fields,
            ..LogEvent::new(LogLevel::Info, event, message)
        });
    }

    /// Convenience: warn event.
    fn warn(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            fields,
            ..LogEvent::new(LogLevel::Warn, event, message)
        });
    }

    /// Convenience: error event.
    fn error(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            fields,
            ..LogEvent::new(LogLevel::Error, event, message)
        });
    }

    /// Convenience: critical event.
    fn critical(&self, event: &str, message: &str, fields: Option<LogFields>) {
        self.log(LogEvent {
            fields,
            ..LogEvent::new(LogLevel::Critical, event, message)
        });
    }
}

/// Build a `LogFields` map from string pairs.
#[must_use]
pub fn log_fields<const N: usize>(pairs: [(&str, &str); N]) -> LogFields {
    pairs
        .into_iter()
        .map(|(key, value)| {
            (
                key.to_owned().into_boxed_str(),
                serde_json::Value::String(value.to_owned()),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation_shared::ErrorCode;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(LogLevel::from_name("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_name(" critical "), Some(LogLevel::Critical));
        assert_eq!(LogLevel::from_name("verbose"), None);
        assert_eq!(LogLevel::from_name_or_warn("verbose"), LogLevel::Warn);
        assert!(LogLevel::Critical > LogLevel::Error);
    }

    #[test]
    fn event_carries_error_chain() {
        let error = ErrorEnvelope::expected(ErrorCode::new("app", "outer"), "outer")
            .with_cause(ErrorEnvelope::expected(ErrorCode::not_found(), "inner"));
        let event = LogEvent::new(LogLevel::Error, "test.event", "failed").with_error(&error);

        let cause_message = event
            .error
            .as_ref()
            .and_then(|value| value.pointer("/cause/message"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(cause_message, Some("inner"));
    }

    #[test]
    fn empty_fields_are_dropped() {
        let event = LogEvent::new(LogLevel::Info, "e", "m").with_fields(LogFields::new());
        assert!(event.fields.is_none());

        let event = LogEvent::new(LogLevel::Info, "e", "m").with_fields(log_fields([("k", "v")]));
        assert_eq!(event.field("k"), Some(&serde_json::Value::from("v")));
    }
}
