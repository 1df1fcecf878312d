//! Suppress selected failures, log them at a chosen level, return a fallback.

use crate::handler::failure_fields;
use crate::matcher::{ErrorMatcher, matches_any};
use foundation_ports::{LogEvent, LogLevel, LoggerPort};
use foundation_shared::{ErrorEnvelope, ErrorMetadata, Result};
use std::borrow::Cow;
use std::sync::Arc;

/// Event name for failures swallowed by [`SuppressAndLog`].
pub const SUPPRESS_AND_LOG_EVENT: &str = "resilient.suppress_and_log";

/// Swallows matching failures.
///
/// Failures outside the matcher list pass through untouched and unlogged.
#[derive(Clone)]
pub struct SuppressAndLog<T> {
    matchers: Vec<ErrorMatcher>,
    fallback: T,
    level: LogLevel,
    logger: Arc<dyn LoggerPort>,
}

/// Build a [`SuppressAndLog`] policy.
///
/// `level` accepts `debug`, `info`, `warn`/`warning`, `error` and `critical`;
/// anything else logs at `warn`.
pub fn suppress_and_log<T>(
    matchers: impl IntoIterator<Item = ErrorMatcher>,
    fallback: T,
    level: &str,
    logger: Arc<dyn LoggerPort>,
) -> SuppressAndLog<T> {
    SuppressAndLog {
        matchers: matchers.into_iter().collect(),
        fallback,
        level: LogLevel::from_name_or_warn(level),
        logger,
    }
}

impl<T> SuppressAndLog<T> {
    /// Level used for suppressed failures.
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Bind this policy to a function.
    pub fn wrap<F>(self, name: impl Into<Cow<'static, str>>, function: F) -> Suppressed<F, T> {
        Suppressed {
            name: name.into(),
            policy: self,
            function,
        }
    }
}

impl<T: Clone> SuppressAndLog<T> {
    /// Run `op`, replacing matching failures with the fallback.
    pub fn run<F, E>(&self, function: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: Into<ErrorEnvelope>,
    {
        op().or_else(|error| {
            let error = error.into();
            if !matches_any(&self.matchers, &error) {
                return Err(error);
            }
            let message = format!("suppressed {} in {function}: {}", error.code, error.message);
            let event = LogEvent::new(self.level, SUPPRESS_AND_LOG_EVENT, &message)
                .with_fields(failure_fields(&error, function, &ErrorMetadata::new()));
            self.logger.log(event);
            Ok(self.fallback.clone())
        })
    }
}

/// A function guarded by [`SuppressAndLog`].
#[derive(Clone)]
pub struct Suppressed<F, T> {
    name: Cow<'static, str>,
    policy: SuppressAndLog<T>,
    function: F,
}

impl<F, T: Clone> Suppressed<F, T> {
    /// Call the function; multiple arguments are passed as a tuple.
    pub fn call<A, E>(&self, args: A) -> Result<T>
    where
        F: Fn(A) -> std::result::Result<T, E>,
        E: Into<ErrorEnvelope>,
    {
        self.policy.run(&self.name, || (self.function)(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation_testkit::MemoryLogger;
    use foundation_testkit::errors::{key_error, key_error_code, value_error};

    fn policy(level: &str) -> (SuppressAndLog<&'static str>, MemoryLogger) {
        let logger = MemoryLogger::new();
        let policy = suppress_and_log(
            [ErrorMatcher::Code(key_error_code())],
            "default",
            level,
            Arc::new(logger.clone()),
        );
        (policy, logger)
    }

    #[test]
    fn matching_failures_return_fallback_at_configured_level() {
        let (policy, logger) = policy("debug");
        let lookup = policy.wrap("lookup", |key: &str| Err::<&str, _>(key_error(key)));

        assert_eq!(lookup.call("theme"), Ok("default"));
        let events = logger.events_named(SUPPRESS_AND_LOG_EVENT);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, LogLevel::Debug);
    }

    #[test]
    fn unknown_level_name_logs_at_warn() {
        assert_eq!(policy("loud").0.level(), LogLevel::Warn);
        assert_eq!(policy("warning").0.level(), LogLevel::Warn);
        assert_eq!(policy("CRITICAL").0.level(), LogLevel::Critical);
    }

    #[test]
    fn other_failures_propagate_without_logging() {
        let (policy, logger) = policy("error");
        let result = policy.run("parse", || Err::<&str, _>(value_error("bad")));

        assert_eq!(result, Err(value_error("bad")));
        assert!(logger.events().is_empty());
    }
}
