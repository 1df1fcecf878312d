//! # foundation-adapters
//!
//! Adapter implementations for ports: JSON and `tracing` loggers, log sinks
//! and SHA-256 checksum verification.
//! This crate depends on `ports`, `shared` and `config`.

pub mod checksum;
pub mod log_sink;
pub mod logger;
pub mod tracing_logger;

pub use checksum::Sha256ChecksumVerifier;
pub use log_sink::{LogSink, StderrLogSink, WriterLogSink};
pub use logger::JsonLogger;
pub use tracing_logger::TracingLogger;

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
