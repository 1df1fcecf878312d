//! End-to-end behavior through the facade.

use foundation::{
    EnvReader, ErrorEnvelope, ErrorMatcher, LogLevel, ResilientErrorHandler, fallback_on_error,
    resilient,
};
use foundation_testkit::MemoryLogger;
use foundation_testkit::errors::{key_error, key_error_code, runtime_error, value_error};
use std::collections::BTreeMap;
use std::sync::Arc;

fn env(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn suppressed_lookup_returns_fallback_with_one_info_log() {
    let logger = MemoryLogger::new();
    let handler = ResilientErrorHandler::new(0_i64, Arc::new(logger.clone()))
        .with_suppress([ErrorMatcher::Code(key_error_code())]);
    let lookup = resilient(handler, "lookup", |key: &str| {
        Err::<i64, ErrorEnvelope>(key_error(key))
    });

    assert_eq!(lookup.call("missing"), Ok(0));

    let events = logger.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, LogLevel::Info);
    let error_type = events[0]
        .field("error_type")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    assert!(error_type.contains("key_error"), "error_type was {error_type}");
}

#[test]
fn default_handler_propagates_the_failure_after_logging() {
    let logger = MemoryLogger::new();
    let handler = ResilientErrorHandler::<i64>::with_default_fallback(Arc::new(logger.clone()));
    let parse = resilient(handler, "parse", |()| Err::<i64, _>(value_error("bad")));

    assert_eq!(parse.call(()), Err(value_error("bad")));

    let events = logger.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, LogLevel::Error);
}

#[test]
fn fallback_function_replaces_a_failing_fetch() {
    let logger = MemoryLogger::new();
    let fetch = fallback_on_error(|()| Ok::<_, ErrorEnvelope>("cached"), Arc::new(logger.clone()))
        .wrap("fetch", |()| Err::<&str, _>(runtime_error("upstream down")));

    assert_eq!(fetch.call(()), Ok("cached"));

    let warnings = logger.events_at(LogLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("core:internal"));
    assert_eq!(
        warnings[0].field("error_type"),
        Some(&serde_json::Value::from("core:internal"))
    );
}

#[test]
fn blank_bool_ignores_the_default_and_warns() {
    let logger = MemoryLogger::new();
    let reader = EnvReader::new(env(&[("FOO", "")]), Arc::new(logger.clone()));

    assert_eq!(reader.get_bool("FOO", Some(true)), Ok(None));
    assert_eq!(logger.events_at(LogLevel::Warn).len(), 1);
}

#[test]
fn list_drops_empty_items() {
    let logger = MemoryLogger::new();
    let reader = EnvReader::new(env(&[("ITEMS", "x,y,,z")]), Arc::new(logger));

    assert_eq!(reader.get_list("ITEMS", None), vec!["x", "y", "z"]);
}
