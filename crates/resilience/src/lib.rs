//! # foundation-resilience
//!
//! Error handling wrappers: guard a call with a [`ResilientErrorHandler`],
//! swallow selected failures with [`suppress_and_log`], or delegate to a
//! second function with [`fallback_on_error`].
//!
//! Failures are [`foundation_shared::ErrorEnvelope`] values and are selected
//! with [`ErrorMatcher`]. Panics are never caught.
//!
//! This crate depends on `ports` and `shared` only.

pub mod fallback;
pub mod handler;
pub mod matcher;
pub mod suppress;
pub mod wrapper;

pub use fallback::{
    FALLBACK_EVENT, FALLBACK_FAILED_EVENT, FallbackOnError, WithFallback, fallback_on_error,
};
pub use handler::{
    ContextProvider, ERROR_EVENT, ErrorMapper, ResilientErrorHandler, SUPPRESSED_EVENT,
};
pub use matcher::{ErrorMatcher, matches_any};
pub use suppress::{SUPPRESS_AND_LOG_EVENT, SuppressAndLog, Suppressed, suppress_and_log};
pub use wrapper::{ANONYMOUS, Resilient, resilient};

/// Returns the resilience crate version.
#[must_use]
pub const fn resilience_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
