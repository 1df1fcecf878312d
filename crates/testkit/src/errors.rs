//! Error envelope fixtures for handler and wrapper tests.

use foundation_shared::{ErrorCode, ErrorEnvelope, ErrorKind};

/// Code used by [`key_error`].
pub fn key_error_code() -> ErrorCode {
    ErrorCode::new("lookup", "key_error")
}

/// A missing-key lookup failure.
pub fn key_error(key: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(key_error_code(), format!("missing key: {key}"))
        .with_metadata("key", key)
}

/// A bad-value failure (`core:value_error`).
pub fn value_error(message: &str) -> ErrorEnvelope {
    ErrorEnvelope::expected(ErrorCode::new("core", "value_error"), message)
}

/// An unexpected runtime failure carrying the default internal code.
pub fn runtime_error(message: &str) -> ErrorEnvelope {
    ErrorEnvelope::of_kind(ErrorKind::Unexpected, message)
}
