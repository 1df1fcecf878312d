//! Replace a failing call with a call to a fallback function.

use crate::handler::failure_fields;
use crate::matcher::{ErrorMatcher, matches_any};
use foundation_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use foundation_shared::{ErrorEnvelope, ErrorMetadata, Result};
use std::borrow::Cow;
use std::sync::Arc;

/// Event name for a failure handed to the fallback function.
pub const FALLBACK_EVENT: &str = "resilient.fallback";
/// Event name for a failing fallback function.
pub const FALLBACK_FAILED_EVENT: &str = "resilient.fallback_failed";

/// Calls `fallback` with the same arguments when the primary call fails.
///
/// This is a single step: a failing fallback is logged and returned with the
/// primary failure as its cause, never retried or suppressed.
#[derive(Clone)]
pub struct FallbackOnError<G> {
    matchers: Vec<ErrorMatcher>,
    log: bool,
    fallback: G,
    logger: Arc<dyn LoggerPort>,
}

/// Build a [`FallbackOnError`] policy that handles every failure and logs a
/// warning before falling back.
pub fn fallback_on_error<G>(fallback: G, logger: Arc<dyn LoggerPort>) -> FallbackOnError<G> {
    FallbackOnError {
        matchers: Vec::new(),
        log: true,
        fallback,
        logger,
    }
}

impl<G> FallbackOnError<G> {
    /// Only fall back for matching failures; an empty list means all.
    #[must_use]
    pub fn on(mut self, matchers: impl IntoIterator<Item = ErrorMatcher>) -> Self {
        self.matchers = matchers.into_iter().collect();
        self
    }

    /// Enable or disable the warning logged before falling back.
    #[must_use]
    pub const fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Bind this policy to a function.
    pub fn wrap<F>(self, name: impl Into<Cow<'static, str>>, function: F) -> WithFallback<F, G> {
        WithFallback {
            name: name.into(),
            policy: self,
            function,
        }
    }

    fn handles(&self, error: &ErrorEnvelope) -> bool {
        self.matchers.is_empty() || matches_any(&self.matchers, error)
    }

    /// Run `primary`, falling back to the policy function with a clone of `args`.
    pub fn run<A, T, F, E1, E2>(&self, function: &str, args: A, primary: F) -> Result<T>
    where
        A: Clone,
        F: FnOnce(A) -> std::result::Result<T, E1>,
        G: Fn(A) -> std::result::Result<T, E2>,
        E1: Into<ErrorEnvelope>,
        E2: Into<ErrorEnvelope>,
    {
        let error = match primary(args.clone()) {
            Ok(value) => return Ok(value),
            Err(error) => error.into(),
        };
        if !self.handles(&error) {
            return Err(error);
        }

        if self.log {
            let message = format!("{} in {function}; using fallback", error.code);
            let event = LogEvent::new(LogLevel::Warn, FALLBACK_EVENT, &message)
                .with_fields(failure_fields(&error, function, &ErrorMetadata::new()));
            self.logger.log(event);
        }

        (self.fallback)(args).map_err(|fallback_error| {
            let fallback_error = fallback_error.into();
            self.log_fallback_failure(function, &error, &fallback_error);
            fallback_error.with_cause(error)
        })
    }

    fn log_fallback_failure(
        &self,
        function: &str,
        original: &ErrorEnvelope,
        fallback_error: &ErrorEnvelope,
    ) {
        let mut fields = LogFields::new();
        fields.insert("function".into(), serde_json::Value::from(function));
        fields.insert(
            "error".into(),
            serde_json::Value::from(original.message.as_str()),
        );
        fields.insert(
            "error_type".into(),
            serde_json::Value::String(original.code.to_string()),
        );
        fields.insert(
            "fallback_error".into(),
            serde_json::Value::from(fallback_error.message.as_str()),
        );
        fields.insert(
            "fallback_error_type".into(),
            serde_json::Value::String(fallback_error.code.to_string()),
        );
        let message = format!(
            "fallback for {function} failed: {} (original: {})",
            fallback_error.message, original.message
        );
        let event = LogEvent::new(LogLevel::Error, FALLBACK_FAILED_EVENT, &message)
            .with_fields(fields)
            .with_error(fallback_error);
        self.logger.log(event);
    }
}

/// A function guarded by [`FallbackOnError`].
#[derive(Clone)]
pub struct WithFallback<F, G> {
    name: Cow<'static, str>,
    policy: FallbackOnError<G>,
    function: F,
}

impl<F, G> WithFallback<F, G> {
    /// Call the function; multiple arguments are passed as a tuple.
    pub fn call<A, T, E1, E2>(&self, args: A) -> Result<T>
    where
        A: Clone,
        F: Fn(A) -> std::result::Result<T, E1>,
        G: Fn(A) -> std::result::Result<T, E2>,
        E1: Into<ErrorEnvelope>,
        E2: Into<ErrorEnvelope>,
    {
        self.policy.run(&self.name, args, &self.function)
    }
}
