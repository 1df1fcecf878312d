//! Error envelope types and helpers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, io};

/// Diagnostic context attached to errors.
pub type ErrorMetadata = BTreeMap<String, String>;

/// High-level classification of error origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Expected failures (validation, user input, cancellation).
    Expected,
    /// Invariant violations.
    Invariant,
    /// Unexpected failures (I/O, external dependencies).
    Unexpected,
}

impl ErrorKind {
    /// Code carried by an envelope of this kind when no specific code was chosen.
    #[must_use]
    pub fn default_code(self) -> ErrorCode {
        match self {
            Self::Expected => ErrorCode::invalid_input(),
            Self::Invariant => ErrorCode::invariant(),
            Self::Unexpected => ErrorCode::internal(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected => formatter.write_str("expected"),
            Self::Invariant => formatter.write_str("invariant"),
            Self::Unexpected => formatter.write_str("unexpected"),
        }
    }
}

/// Retry classification for failure handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// The operation can be retried safely.
    Retriable,
    /// The operation should not be retried.
    NonRetriable,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Retriable => "retriable",
            Self::NonRetriable => "non-retriable",
        })
    }
}

/// Stable error code: a namespace plus an identifier, shown as `ns:id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Build a code from its two parts.
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    fn core(code: &str) -> Self {
        Self::new("core", code)
    }

    /// `core:cancelled`
    pub fn cancelled() -> Self {
        Self::core("cancelled")
    }

    /// `core:invalid_input`, the default for expected failures.
    pub fn invalid_input() -> Self {
        Self::core("invalid_input")
    }

    /// `core:invariant`, the default for invariant violations.
    pub fn invariant() -> Self {
        Self::core("invariant")
    }

    /// `core:not_found`
    pub fn not_found() -> Self {
        Self::core("not_found")
    }

    /// `core:timeout`
    pub fn timeout() -> Self {
        Self::core("timeout")
    }

    /// `core:io`
    pub fn io() -> Self {
        Self::core("io")
    }

    /// `core:internal`, the default for unexpected failures.
    pub fn internal() -> Self {
        Self::core("internal")
    }

    /// Namespace part.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Identifier part.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Structured error envelope shared across crates.
///
/// Every envelope carries a stable code, free-form diagnostic metadata and an
/// optional cause, so wrappers can enrich one envelope from another without
/// losing the original failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Origin category.
    pub kind: ErrorKind,
    /// Retry classification.
    pub class: ErrorClass,
    /// Stable error code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Diagnostic context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
    /// The failure this envelope was raised from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorEnvelope>>,
}

impl ErrorEnvelope {
    /// Expected, non-retriable failure.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Expected, ErrorClass::NonRetriable, code, message.into())
    }

    /// Unexpected failure with an explicit retry classification.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>, class: ErrorClass) -> Self {
        Self::build(ErrorKind::Unexpected, class, code, message.into())
    }

    /// Non-retriable failure of `kind` carrying that kind's default code.
    pub fn of_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::build(kind, ErrorClass::NonRetriable, kind.default_code(), message.into())
    }

    const fn build(kind: ErrorKind, class: ErrorClass, code: ErrorCode, message: String) -> Self {
        Self {
            kind,
            class,
            code,
            message,
            metadata: BTreeMap::new(),
            cause: None,
        }
    }

    /// Returns true when the code is still the default for this envelope's kind.
    #[must_use]
    pub fn has_default_code(&self) -> bool {
        self.code == self.kind.default_code()
    }

    /// Attach a single metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Merge a metadata map; incoming keys overwrite existing ones.
    #[must_use]
    pub fn with_context(mut self, context: ErrorMetadata) -> Self {
        self.metadata.extend(context);
        self
    }

    /// Set the direct cause, replacing any previous one.
    #[must_use]
    pub fn with_cause(mut self, cause: Self) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Append `cause` below the last envelope of this chain.
    ///
    /// Existing causes stay in place; `cause` becomes the new root.
    #[must_use]
    pub fn with_root_cause(mut self, cause: Self) -> Self {
        let root = match self.cause.take() {
            Some(existing) => (*existing).with_root_cause(cause),
            None => cause,
        };
        self.cause = Some(Box::new(root));
        self
    }

    /// Returns the direct cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&Self> {
        self.cause.as_deref()
    }

    /// Iterate from this envelope through its chain of causes.
    #[must_use]
    pub const fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }
}

/// Iterator over an envelope and its causes.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a ErrorEnvelope>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a ErrorEnvelope;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}: {}",
            self.kind, self.class, self.code, self.message
        )
    }
}

impl std::error::Error for ErrorEnvelope {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|cause| {
            let source: &(dyn std::error::Error + 'static) = cause;
            source
        })
    }
}

impl From<io::Error> for ErrorEnvelope {
    fn from(error: io::Error) -> Self {
        normalize_unexpected_error(&error)
    }
}

/// Wrap a foreign error as an unexpected envelope.
///
/// An `io::Error` anywhere in the source chain decides the code and retry
/// class; anything else becomes `core:internal`.
pub fn normalize_unexpected_error(error: &(dyn std::error::Error + 'static)) -> ErrorEnvelope {
    let io_kind = std::iter::successors(Some(error), |current| current.source())
        .find_map(|current| current.downcast_ref::<io::Error>())
        .map(io::Error::kind);

    let (code, class) = match io_kind {
        None => (ErrorCode::internal(), ErrorClass::NonRetriable),
        Some(io::ErrorKind::NotFound) => (ErrorCode::not_found(), ErrorClass::NonRetriable),
        Some(io::ErrorKind::TimedOut) => (ErrorCode::timeout(), ErrorClass::Retriable),
        Some(io::ErrorKind::Interrupted) => (ErrorCode::cancelled(), ErrorClass::Retriable),
        Some(
            io::ErrorKind::WouldBlock
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe,
        ) => (ErrorCode::io(), ErrorClass::Retriable),
        Some(_) => (ErrorCode::io(), ErrorClass::NonRetriable),
    };
    ErrorEnvelope::unexpected(code, error.to_string(), class)
}
