//! Bridge from `LoggerPort` events into `tracing`.
//!
//! Hosts that already install a `tracing` subscriber can route foundation
//! events through it instead of writing JSON lines directly.

use foundation_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use foundation_shared::{REDACTED, is_secret_key};
use serde_json::Value;

/// Logger forwarding events to the current `tracing` dispatcher.
///
/// Fields are flattened into a single `fields` JSON value; `Critical` maps to
/// the `ERROR` level with `critical = true`.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Create a bridge without base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());
        let fields: serde_json::Map<String, Value> = fields
            .into_iter()
            .map(|(key, value)| {
                let value = if is_secret_key(&key) {
                    Value::from(REDACTED)
                } else {
                    value
                };
                (key.into_string(), value)
            })
            .collect();
        let fields = Value::Object(fields).to_string();
        let error = event.error.map(|error| error.to_string()).unwrap_or_default();
        let name = event.event.as_ref();
        let message = event.message.as_ref();

        match event.level {
            LogLevel::Debug => {
                tracing::debug!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Info => {
                tracing::info!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Warn => {
                tracing::warn!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Error => {
                tracing::error!(event = name, fields = %fields, error = %error, "{message}");
            },
            LogLevel::Critical => {
                tracing::error!(
                    event = name,
                    critical = true,
                    fields = %fields,
                    error = %error,
                    "{message}"
                );
            },
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut base_fields = self.base_fields.clone();
        base_fields.extend(fields);
        Box::new(Self { base_fields })
    }
}
