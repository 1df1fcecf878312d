//! Structured JSON logger adapter.

use crate::log_sink::LogSink;
use foundation_config::LoggingSettings;
use foundation_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use foundation_shared::{REDACTED, is_secret_key};
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// JSON logger emitting one line per event.
///
/// Values under secret-looking keys are replaced in fields and in the error
/// payload, at any depth.
#[derive(Clone)]
pub struct JsonLogger {
    sink: Arc<dyn LogSink>,
    base_fields: LogFields,
    min_level: LogLevel,
}

impl JsonLogger {
    /// Create a JSON logger backed by the provided sink.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            base_fields: LogFields::new(),
            min_level: LogLevel::Info,
        }
    }

    /// Create a logger configured from env-derived settings.
    #[must_use]
    pub fn from_settings(sink: Arc<dyn LogSink>, settings: &LoggingSettings) -> Self {
        Self::new(sink)
            .with_min_level(settings.level)
            .with_base_fields(settings.log_fields())
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }

    /// Set the minimum log level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    fn encode(&self, event: LogEvent) -> String {
        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());
        redact_fields(&mut fields);

        let mut payload = serde_json::Map::new();
        payload.insert("timestampMs".to_string(), Value::from(now_epoch_ms()));
        payload.insert("level".to_string(), Value::from(event.level.as_str()));
        payload.insert("event".to_string(), Value::from(event.event.as_ref()));
        payload.insert("message".to_string(), Value::from(event.message.as_ref()));
        if !fields.is_empty() {
            let fields = fields
                .into_iter()
                .map(|(key, value)| (key.into_string(), value))
                .collect();
            payload.insert("fields".to_string(), Value::Object(fields));
        }
        if let Some(mut error) = event.error {
            redact_value(&mut error);
            payload.insert("error".to_string(), error);
        }

        serde_json::to_string(&Value::Object(payload)).map_or_else(
            |_| {
                "{\"timestampMs\":0,\"level\":\"error\",\"event\":\"logger.serialize_failed\",\"message\":\"log serialization failed\"}\n"
                    .to_string()
            },
            |mut encoded| {
                encoded.push('\n');
                encoded
            },
        )
    }
}

impl LoggerPort for JsonLogger {
    fn log(&self, event: LogEvent) {
        if event.level < self.min_level {
            return;
        }
        let line = self.encode(event);
        self.sink.write_line(&line);
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            sink: Arc::clone(&self.sink),
            base_fields: merged,
            min_level: self.min_level,
        })
    }
}

fn redact_fields(fields: &mut LogFields) {
    for (key, value) in fields.iter_mut() {
        if is_secret_key(key) {
            *value = Value::String(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if is_secret_key(key) {
                    *nested = Value::String(REDACTED.to_string());
                } else {
                    redact_value(nested);
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                redact_value(item);
            }
        },
        _ => {},
    }
}

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| u64::try_from(duration.as_millis()).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_sink::WriterLogSink;
    use foundation_ports::log_fields;
    use foundation_shared::{ErrorCode, ErrorEnvelope};
    use std::collections::BTreeMap;

    fn logger(min_level: LogLevel) -> (JsonLogger, Arc<WriterLogSink<Vec<u8>>>) {
        let sink = Arc::new(WriterLogSink::new(Vec::new()));
        (JsonLogger::new(sink.clone()).with_min_level(min_level), sink)
    }

    fn parse_lines(sink: &WriterLogSink<Vec<u8>>) -> Result<Vec<Value>, serde_json::Error> {
        sink.lines().iter().map(|line| serde_json::from_str(line)).collect()
    }

    #[test]
    fn secret_fields_and_error_metadata_are_redacted() -> Result<(), Box<dyn std::error::Error>> {
        let (logger, sink) = logger(LogLevel::Debug);
        let error = ErrorEnvelope::expected(ErrorCode::new("config", "invalid_env_int"), "bad")
            .with_metadata("env_var", "PORT")
            .with_cause(
                ErrorEnvelope::expected(ErrorCode::invalid_input(), "inner")
                    .with_metadata("api_token", "tok-123"),
            );

        logger.log(
            LogEvent::new(LogLevel::Error, "test.event", "testing")
                .with_fields(log_fields([("apiKey", "secret"), ("safe", "ok")]))
                .with_error(&error),
        );

        let lines = parse_lines(&sink)?;
        assert_eq!(lines.len(), 1);
        let payload = &lines[0];
        assert_eq!(
            payload.pointer("/fields/apiKey"),
            Some(&Value::from(REDACTED))
        );
        assert_eq!(payload.pointer("/fields/safe"), Some(&Value::from("ok")));
        assert_eq!(
            payload.pointer("/error/metadata/env_var"),
            Some(&Value::from("PORT"))
        );
        assert_eq!(
            payload.pointer("/error/cause/metadata/api_token"),
            Some(&Value::from(REDACTED))
        );
        Ok(())
    }

    #[test]
    fn events_below_min_level_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let (logger, sink) = logger(LogLevel::Warn);
        logger.info("test.info", "dropped", None);
        logger.warn("test.warn", "kept", None);
        logger.critical("test.critical", "kept", None);

        let levels: Vec<Value> = parse_lines(&sink)?
            .into_iter()
            .filter_map(|line| line.get("level").cloned())
            .collect();
        assert_eq!(levels, vec![Value::from("warn"), Value::from("critical")]);
        Ok(())
    }

    #[test]
    fn child_logger_merges_fields() -> Result<(), Box<dyn std::error::Error>> {
        let (logger, sink) = logger(LogLevel::Debug);
        let child = logger.child(log_fields([("correlationId", "req_123")]));
        child.info("test.child", "child log", Some(log_fields([("step", "one")])));

        let lines = parse_lines(&sink)?;
        assert_eq!(
            lines[0].pointer("/fields/correlationId"),
            Some(&Value::from("req_123"))
        );
        assert_eq!(lines[0].pointer("/fields/step"), Some(&Value::from("one")));
        Ok(())
    }

    #[test]
    fn settings_drive_level_and_base_fields() -> Result<(), Box<dyn std::error::Error>> {
        let sink = Arc::new(WriterLogSink::new(Vec::new()));
        let settings = LoggingSettings {
            level: LogLevel::Error,
            base_fields: BTreeMap::from([("service".to_string(), "api".to_string())]),
        };
        let logger = JsonLogger::from_settings(sink.clone(), &settings);
        logger.warn("test.warn", "dropped", None);
        logger.error("test.error", "kept", None);

        let lines = parse_lines(&sink)?;
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].pointer("/fields/service"), Some(&Value::from("api")));
        Ok(())
    }
}
