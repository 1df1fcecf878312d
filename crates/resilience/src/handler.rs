//! Configurable error handling around a single operation.
//!
//! Every handled failure ends in exactly one terminal action:
//! - the fallback value is returned (suppressed, or `reraise` disabled)
//! - a mapped error is returned with the original as its cause
//! - the original error is returned unchanged

use crate::matcher::{ErrorMatcher, matches_any};
use foundation_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use foundation_shared::{ErrorEnvelope, ErrorMetadata, Result};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::future::Future;
use std::sync::Arc;

/// Produces dynamic diagnostic context at failure time.
pub type ContextProvider = Arc<dyn Fn() -> ErrorMetadata + Send + Sync>;

/// Translates one error into another.
pub type ErrorMapper = Arc<dyn Fn(&ErrorEnvelope) -> ErrorEnvelope + Send + Sync>;

/// Event name for suppressed failures.
pub const SUPPRESSED_EVENT: &str = "resilient.suppressed";
/// Event name for handled, unsuppressed failures.
pub const ERROR_EVENT: &str = "resilient.error";

/// Error handling policy for one wrapped operation.
///
/// The handler carries no mutable state; the same instance may serve any
/// number of calls.
#[derive(Clone)]
pub struct ResilientErrorHandler<T> {
    fallback: T,
    log_errors: bool,
    context_provider: Option<ContextProvider>,
    context: ErrorMetadata,
    error_mapper: Option<ErrorMapper>,
    suppress: Option<Vec<ErrorMatcher>>,
    reraise: bool,
    logger: Arc<dyn LoggerPort>,
}

impl<T: Default> ResilientErrorHandler<T> {
    /// Handler with `T::default()` as the fallback.
    #[must_use]
    pub fn with_default_fallback(logger: Arc<dyn LoggerPort>) -> Self {
        Self::new(T::default(), logger)
    }
}

impl<T> ResilientErrorHandler<T> {
    /// Handler that logs and re-raises everything, with `fallback` available
    /// to suppress rules and `with_reraise(false)`.
    #[must_use]
    pub fn new(fallback: T, logger: Arc<dyn LoggerPort>) -> Self {
        Self {
            fallback,
            log_errors: true,
            context_provider: None,
            context: ErrorMetadata::new(),
            error_mapper: None,
            suppress: None,
            reraise: true,
            logger,
        }
    }

    /// Enable or disable failure logging.
    #[must_use]
    pub const fn with_log_errors(mut self, log_errors: bool) -> Self {
        self.log_errors = log_errors;
        self
    }

    /// Set the dynamic context provider.
    #[must_use]
    pub fn with_context_provider<P>(mut self, provider: P) -> Self
    where
        P: Fn() -> ErrorMetadata + Send + Sync + 'static,
    {
        self.context_provider = Some(Arc::new(provider));
        self
    }

    /// Add a static context entry.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Set the error mapper.
    #[must_use]
    pub fn with_error_mapper<M>(mut self, mapper: M) -> Self
    where
        M: Fn(&ErrorEnvelope) -> ErrorEnvelope + Send + Sync + 'static,
    {
        self.error_mapper = Some(Arc::new(mapper));
        self
    }

    /// Set the suppress list.
    #[must_use]
    pub fn with_suppress(mut self, matchers: impl IntoIterator<Item = ErrorMatcher>) -> Self {
        self.suppress = Some(matchers.into_iter().collect());
        self
    }

    /// Choose whether unsuppressed failures propagate.
    #[must_use]
    pub const fn with_reraise(mut self, reraise: bool) -> Self {
        self.reraise = reraise;
        self
    }

    /// The fallback value.
    pub const fn fallback(&self) -> &T {
        &self.fallback
    }

    /// Provider output overlaid with the static context.
    #[must_use]
    pub fn build_context(&self) -> ErrorMetadata {
        let mut context = self
            .context_provider
            .as_ref()
            .map(|provider| provider())
            .unwrap_or_default();
        context.extend(
            self.context
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        context
    }

    /// Returns true when the suppress list selects `error`.
    #[must_use]
    pub fn should_suppress(&self, error: &ErrorEnvelope) -> bool {
        self.suppress
            .as_deref()
            .is_some_and(|matchers| matches_any(matchers, error))
    }

    /// Log a suppressed failure at info level.
    pub fn log_suppressed(&self, error: &ErrorEnvelope, function: &str, context: &ErrorMetadata) {
        if !self.log_errors {
            return;
        }
        let message = format!("suppressed {} in {function}", error.code);
        let event = LogEvent::new(LogLevel::Info, SUPPRESSED_EVENT, &message)
            .with_fields(failure_fields(error, function, context));
        self.logger.log(event);
    }

    /// Log an unsuppressed failure at error level with its cause chain and,
    /// when enabled by the environment, a backtrace.
    pub fn log_error(&self, error: &ErrorEnvelope, function: &str, context: &ErrorMetadata) {
        if !self.log_errors {
            return;
        }
        let mut fields = failure_fields(error, function, context);
        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            fields.insert(
                "backtrace".into(),
                serde_json::Value::String(backtrace.to_string()),
            );
        }
        let message = format!("error in {function}: {}", error.message);
        let event = LogEvent::new(LogLevel::Error, ERROR_EVENT, &message)
            .with_fields(fields)
            .with_error(error);
        self.logger.log(event);
    }

    /// Apply the error mapper.
    ///
    /// Returns `None` when no mapper is set or it produced an envelope equal
    /// to `error`. Otherwise the mapped envelope is enriched from `error`:
    /// - its code is replaced by the original's only when the mapped code is
    ///   its kind's default and the original's is not
    /// - metadata is merged, the mapped envelope's keys winning
    /// - the original's cause is copied over when the mapped one has none
    #[must_use]
    pub fn map_error(&self, error: &ErrorEnvelope) -> Option<ErrorEnvelope> {
        let mapper = self.error_mapper.as_ref()?;
        let mut mapped = mapper(error);
        if &mapped == error {
            return None;
        }

        if mapped.has_default_code() && !error.has_default_code() {
            mapped.code = error.code.clone();
        }

        let mut metadata = error.metadata.clone();
        metadata.extend(std::mem::take(&mut mapped.metadata));
        mapped.metadata = metadata;

        if mapped.cause.is_none() {
            mapped.cause.clone_from(&error.cause);
        }
        Some(mapped)
    }
}

impl<T: Clone> ResilientErrorHandler<T> {
    /// Decide the outcome for a failure raised by `function`.
    ///
    /// A panicking context provider or mapper is not caught.
    pub fn process_error(&self, error: ErrorEnvelope, function: &str) -> Result<T> {
        let context = self.build_context();

        if self.should_suppress(&error) {
            self.log_suppressed(&error, function, &context);
            return Ok(self.fallback.clone());
        }

        self.log_error(&error, function, &context);

        if !self.reraise {
            return Ok(self.fallback.clone());
        }

        match self.map_error(&error) {
            Some(mapped) => Err(raise_from(mapped, error)),
            None => Err(error),
        }
    }

    /// Run a synchronous operation under this policy.
    pub fn run<F, E>(&self, function: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: Into<ErrorEnvelope>,
    {
        op().or_else(|error| self.process_error(error.into(), function))
    }

    /// Run an asynchronous operation under this policy.
    ///
    /// The operation is awaited exactly once. Dropping the returned future
    /// cancels it without logging.
    pub async fn run_async<F, Fut, E>(&self, function: &str, op: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<ErrorEnvelope>,
    {
        match op().await {
            Ok(value) => Ok(value),
            Err(error) => self.process_error(error.into(), function),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ResilientErrorHandler<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ResilientErrorHandler")
            .field("fallback", &self.fallback)
            .field("log_errors", &self.log_errors)
            .field("context_provider", &self.context_provider.is_some())
            .field("context", &self.context)
            .field("error_mapper", &self.error_mapper.is_some())
            .field("suppress", &self.suppress)
            .field("reraise", &self.reraise)
            .finish_non_exhaustive()
    }
}

/// Context keys, then `function`, `error` and `error_type` (which win on collision).
/// Chain `original` under `mapped` without dropping a cause the mapper set.
///
/// A cause copied forward from `original` is replaced by `original` itself;
/// a cause of the mapper's own keeps its place and `original` becomes the
/// root of the chain.
fn raise_from(mapped: ErrorEnvelope, original: ErrorEnvelope) -> ErrorEnvelope {
    if mapped.cause == original.cause {
        mapped.with_cause(original)
    } else if mapped.chain().any(|link| link == &original) {
        mapped
    } else {
        mapped.with_root_cause(original)
    }
}

pub(crate) fn failure_fields(
    error: &ErrorEnvelope,
    function: &str,
    context: &ErrorMetadata,
) -> LogFields {
    let mut fields: LogFields = context
        .iter()
        .map(|(key, value)| {
            (
                key.clone().into_boxed_str(),
                serde_json::Value::String(value.clone()),
            )
        })
        .collect();
    fields.insert("function".into(), serde_json::Value::from(function));
    fields.insert("error".into(), serde_json::Value::from(error.message.as_str()));
    fields.insert(
        "error_type".into(),
        serde_json::Value::String(error.code.to_string()),
    );
    fields
}
