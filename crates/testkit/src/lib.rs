//! # foundation-testkit
//!
//! Test helpers and in-memory adapters.
//! This crate depends on `ports` and `shared`.

pub mod errors;
pub mod fixtures;
pub mod in_memory;
pub mod logging;

pub use in_memory::{
    InMemoryDownloader, InMemoryInstaller, InMemoryToolCache, PrefixVersionResolver,
    TableChecksumVerifier,
};
pub use logging::{MemoryLogger, NoopLogger};

/// Returns the testkit crate version.
#[must_use]
pub const fn testkit_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation_ports::{LogLevel, LoggerPort, log_fields, ports_crate_version};
    use foundation_shared::shared_crate_version;

    #[test]
    fn testkit_crate_compiles() {
        let version = testkit_crate_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn testkit_can_use_ports_and_shared() {
        let ports_version = ports_crate_version();
        let shared_version = shared_crate_version();

        assert!(!ports_version.is_empty());
        assert!(!shared_version.is_empty());
    }

    #[test]
    fn error_fixtures_are_available() {
        assert!(errors::runtime_error("boom").has_default_code());
        assert_eq!(errors::key_error("id").code, errors::key_error_code());
    }

    #[test]
    fn memory_logger_children_share_events_and_merge_fields() {
        let logger = MemoryLogger::new();
        let child = logger.child(log_fields([("component", "env"), ("shadowed", "base")]));
        child.warn(
            "env.test",
            "child event",
            Some(log_fields([("shadowed", "event")])),
        );
        logger.info("root.test", "root event", None);

        let events = logger.take();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, LogLevel::Warn);
        assert_eq!(
            events[0].field("component"),
            Some(&serde_json::Value::from("env"))
        );
        assert_eq!(
            events[0].field("shadowed"),
            Some(&serde_json::Value::from("event"))
        );
        assert!(events[1].fields.is_none());
        assert!(logger.events().is_empty());
    }
}
