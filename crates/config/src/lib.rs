//! # foundation-config
//!
//! Typed environment variable coercion and env-driven logging settings.
//! This crate depends on `ports` and `shared` only.

/// Typed getters and their validation error.
pub mod env;
/// Value shapes for `require`.
pub mod kind;
/// Raw literal parsers.
pub mod literal;
/// Logging settings loaded from the environment.
pub mod logging;
/// Environment lookup capability.
pub mod source;

pub use env::{DEFAULT_ITEM_SEPARATOR, DEFAULT_KV_SEPARATOR, EnvParseError, EnvReader};
pub use kind::{EnvKind, EnvValue};
pub use literal::{
    MalformedEntry, expand_path, expand_vars, parse_bool_literal, parse_dict_lenient,
    parse_dict_strict, parse_float_literal, parse_int_literal, split_items,
};
pub use logging::{LOG_FIELDS_VAR, LOG_LEVEL_VAR, LoggingSettings};
pub use source::{EnvSource, ProcessEnv};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
