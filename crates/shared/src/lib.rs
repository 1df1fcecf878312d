//! # foundation-shared
//!
//! Shared error envelope, result helpers and redaction utilities for the
//! foundation workspace.
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **One error currency** - Every layer reports failures as [`ErrorEnvelope`]
//! 3. **Serde-compatible** - All public types support serialization

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;
pub mod result;

pub use errors::{
    Chain, ErrorClass, ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata,
    normalize_unexpected_error,
};
pub use redaction::{REDACTED, is_secret_key, preview_value};
pub use result::Result;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
