//! # foundation
//!
//! Facade over the foundation workspace for application code.
//! This crate depends on every library crate and adds nothing of its own
//! beyond convenience constructors.

use std::sync::Arc;

pub use foundation_adapters as adapters;
pub use foundation_config as config;
pub use foundation_ports as ports;
pub use foundation_resilience as resilience;
pub use foundation_shared as shared;
pub use foundation_tools as tools;

pub use foundation_adapters::{JsonLogger, StderrLogSink, TracingLogger};
pub use foundation_config::{EnvKind, EnvParseError, EnvReader, EnvValue, LoggingSettings, ProcessEnv};
pub use foundation_ports::{LogEvent, LogLevel, LoggerPort, ToolMetadata};
pub use foundation_resilience::{
    ErrorMatcher, Resilient, ResilientErrorHandler, fallback_on_error, resilient, suppress_and_log,
};
pub use foundation_shared::{ErrorCode, ErrorEnvelope, ErrorKind, Result};
pub use foundation_tools::{ToolDefinition, ToolManager};

/// Returns the facade crate version.
#[must_use]
pub const fn facade_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// JSON logger writing to stderr, configured from `FOUNDATION_LOG_LEVEL`
/// and `FOUNDATION_LOG_FIELDS`.
#[must_use]
pub fn default_logger() -> Arc<dyn LoggerPort> {
    let bootstrap = EnvReader::process(Arc::new(JsonLogger::new(Arc::new(StderrLogSink))));
    let settings = LoggingSettings::from_env(&bootstrap);
    Arc::new(JsonLogger::from_settings(Arc::new(StderrLogSink), &settings))
}

/// Reader over the process environment that reports through `logger`.
#[must_use]
pub fn process_env(logger: Arc<dyn LoggerPort>) -> EnvReader<ProcessEnv> {
    EnvReader::process(logger)
}
