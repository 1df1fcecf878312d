//! Error selectors used by suppress lists and fallback filters.

use foundation_shared::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind};

/// Predicate over an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorMatcher {
    /// Exact code.
    Code(ErrorCode),
    /// Any code in a namespace.
    Namespace(String),
    /// Any error of a kind.
    Kind(ErrorKind),
    /// Any error with a retry class.
    Class(ErrorClass),
    /// Every error.
    Any,
}

impl ErrorMatcher {
    /// Matcher for `namespace:code`.
    pub fn code(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Code(ErrorCode::new(namespace, code))
    }

    /// Matcher for every code under `namespace`.
    pub fn namespace(namespace: impl Into<String>) -> Self {
        Self::Namespace(namespace.into())
    }

    /// Returns true when `error` is selected.
    #[must_use]
    pub fn matches(&self, error: &ErrorEnvelope) -> bool {
        match self {
            Self::Code(code) => &error.code == code,
            Self::Namespace(namespace) => error.code.namespace() == namespace,
            Self::Kind(kind) => error.kind == *kind,
            Self::Class(class) => error.class == *class,
            Self::Any => true,
        }
    }
}

impl From<ErrorCode> for ErrorMatcher {
    fn from(code: ErrorCode) -> Self {
        Self::Code(code)
    }
}

impl From<ErrorKind> for ErrorMatcher {
    fn from(kind: ErrorKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<ErrorClass> for ErrorMatcher {
    fn from(class: ErrorClass) -> Self {
        Self::Class(class)
    }
}

/// Returns true when any matcher selects `error`.
#[must_use]
pub fn matches_any(matchers: &[ErrorMatcher], error: &ErrorEnvelope) -> bool {
    matchers.iter().any(|matcher| matcher.matches(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchers_select_by_code_namespace_kind_and_class() {
        let error = ErrorEnvelope::unexpected(
            ErrorCode::new("lookup", "key_error"),
            "missing",
            ErrorClass::Retriable,
        );

        assert!(ErrorMatcher::code("lookup", "key_error").matches(&error));
        assert!(!ErrorMatcher::code("lookup", "other").matches(&error));
        assert!(ErrorMatcher::namespace("lookup").matches(&error));
        assert!(ErrorMatcher::from(ErrorKind::Unexpected).matches(&error));
        assert!(!ErrorMatcher::from(ErrorKind::Expected).matches(&error));
        assert!(ErrorMatcher::from(ErrorClass::Retriable).matches(&error));
        assert!(ErrorMatcher::Any.matches(&error));
    }

    #[test]
    fn empty_matcher_list_selects_nothing() {
        let error = ErrorEnvelope::expected(ErrorCode::invalid_input(), "bad");
        assert!(!matches_any(&[], &error));
        assert!(matches_any(
            &[ErrorMatcher::namespace("io"), ErrorMatcher::namespace("core")],
            &error
        ));
    }
}
