//! # foundation-ports
//!
//! Boundary contracts for the foundation workspace: structured logging and
//! the collaborators used by tool management.
//!
//! This crate depends only on `shared`.

use std::future::Future;
use std::pin::Pin;

/// Boxed future used by port traits.
///
/// Boundary traits for I/O-bound work return boxed futures so they stay
/// object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod tools;

pub use logger::*;
pub use tools::*;
