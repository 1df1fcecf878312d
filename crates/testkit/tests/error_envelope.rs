//! Integration tests for shared error propagation.

use foundation_shared::{ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, normalize_unexpected_error};
use foundation_testkit::errors::{key_error, key_error_code, runtime_error, value_error};
use std::error::Error;

#[test]
fn error_envelope_crosses_crates() {
    let failure = runtime_error("worker crashed");
    assert_eq!(failure.code, ErrorCode::internal());

    let boxed: Box<dyn Error> = Box::new(failure);
    let description = boxed.to_string();
    assert!(description.contains("core:internal"));
    assert!(description.contains("worker crashed"));
}

#[test]
fn normalize_unexpected_error_is_available() {
    let envelope = normalize_unexpected_error(&std::fmt::Error);
    assert_eq!(envelope.code, ErrorCode::internal());
    assert_eq!(envelope.kind, ErrorKind::Unexpected);

    let io_error = std::io::Error::new(std::io::ErrorKind::TimedOut, "timeout");
    let envelope = ErrorEnvelope::from(io_error);
    assert_eq!(envelope.code, ErrorCode::timeout());
    assert_eq!(envelope.class, ErrorClass::Retriable);
}

#[test]
fn fixtures_cover_default_and_custom_codes() {
    assert!(runtime_error("boom").has_default_code());
    assert!(!value_error("bad").has_default_code());

    let missing = key_error("user");
    assert_eq!(missing.code, key_error_code());
    assert_eq!(missing.metadata.get("key").map(String::as_str), Some("user"));
}

#[test]
fn source_walks_the_cause_chain() {
    let outer = value_error("outer").with_cause(key_error("inner"));
    let source = outer
        .source()
        .and_then(|source| source.downcast_ref::<ErrorEnvelope>());
    assert_eq!(source.map(|inner| &inner.code), Some(&key_error_code()));
    assert_eq!(outer.chain().count(), 2);
}
