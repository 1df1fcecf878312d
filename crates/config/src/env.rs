//! Typed environment variable getters.
//!
//! Every getter reads the variable at call time through an [`EnvSource`] and:
//! - returns the caller's default when the variable is unset
//! - fails with an [`EnvParseError`] on malformed scalars
//! - never caches or normalizes beyond the documented trimming
//!
//! Only `get_bool` treats a blank value specially; every other getter sees
//! an empty string as an ordinary value.

use crate::kind::{EnvKind, EnvValue};
use crate::literal::{
    expand_path, parse_bool_literal, parse_dict_lenient, parse_dict_strict, parse_float_literal,
    parse_int_literal, split_items,
};
use crate::source::{EnvSource, ProcessEnv};
use foundation_ports::{LoggerPort, log_fields};
use foundation_shared::{ErrorCode, ErrorEnvelope, REDACTED, is_secret_key, preview_value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default separator for list, tuple, set and dict items.
pub const DEFAULT_ITEM_SEPARATOR: char = ',';
/// Default separator between dict keys and values.
pub const DEFAULT_KV_SEPARATOR: char = '=';

const PREVIEW_CHARS: usize = 50;

/// Validation failures when coercing env variables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvParseError {
    /// Boolean env var had an invalid value.
    #[error("{var} must be a boolean")]
    InvalidBool {
        /// Env var name.
        var: Box<str>,
        /// Raw input value.
        value: String,
    },
    /// Integer env var had an invalid value.
    #[error("{var} must be an integer")]
    InvalidInt {
        /// Env var name.
        var: Box<str>,
        /// Raw input value.
        value: String,
    },
    /// Float env var had an invalid value.
    #[error("{var} must be a float")]
    InvalidFloat {
        /// Env var name.
        var: Box<str>,
        /// Raw input value.
        value: String,
    },
    /// A required env var was not set.
    #[error("{var} is required")]
    Missing {
        /// Env var name.
        var: Box<str>,
    },
    /// Dict env var contained an item without a key/value separator.
    #[error("{var} must be a list of key/value pairs")]
    InvalidDict {
        /// Env var name.
        var: Box<str>,
        /// Raw input value.
        value: String,
        /// First malformed item.
        entry: String,
    },
}

impl EnvParseError {
    /// Name of the offending variable.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidBool { var, .. }
            | Self::InvalidInt { var, .. }
            | Self::InvalidFloat { var, .. }
            | Self::Missing { var }
            | Self::InvalidDict { var, .. } => var,
        }
    }

    /// Raw value, when the variable was set.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::InvalidBool { value, .. }
            | Self::InvalidInt { value, .. }
            | Self::InvalidFloat { value, .. }
            | Self::InvalidDict { value, .. } => Some(value),
            Self::Missing { .. } => None,
        }
    }

    /// Tag naming the expected shape.
    #[must_use]
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::InvalidBool { .. } => "boolean",
            Self::InvalidInt { .. } => "integer",
            Self::InvalidFloat { .. } => "float",
            Self::Missing { .. } => "required",
            Self::InvalidDict { .. } => "dict",
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
            Self::InvalidFloat { .. } => ErrorCode::new("config", "invalid_env_float"),
            Self::Missing { .. } => ErrorCode::new("config", "missing_env_var"),
            Self::InvalidDict { .. } => ErrorCode::new("config", "invalid_env_dict"),
        }
    }
}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let mut envelope = Self::expected(error.error_code(), error.to_string())
            .with_metadata("env_var", error.field())
            .with_metadata("rule", error.rule());

        if let Some(value) = error.value() {
            envelope = envelope.with_metadata("value", redact_value(error.field(), value));
        }
        envelope
    }
}

fn redact_value(var: &str, value: &str) -> String {
    if is_secret_key(var) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

/// Typed reader over an environment source.
#[derive(Clone)]
pub struct EnvReader<S> {
    source: S,
    logger: Arc<dyn LoggerPort>,
}

impl EnvReader<ProcessEnv> {
    /// Reader over the real process environment.
    #[must_use]
    pub fn process(logger: Arc<dyn LoggerPort>) -> Self {
        Self::new(ProcessEnv, logger)
    }
}

impl<S: EnvSource> EnvReader<S> {
    /// Create a reader; warnings go to `logger`.
    #[must_use]
    pub fn new(source: S, logger: Arc<dyn LoggerPort>) -> Self {
        Self { source, logger }
    }

    /// Borrow the underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Boolean variable.
    ///
    /// Unset returns `default`. Set but blank returns `Ok(None)` and logs a
    /// warning, regardless of `default`.
    pub fn get_bool(&self, name: &str, default: Option<bool>) -> Result<Option<bool>, EnvParseError> {
        match self.source.var(name) {
            None => Ok(default),
            Some(raw) => self.bool_from_raw(name, raw),
        }
    }

    /// Integer variable.
    pub fn get_int(&self, name: &str, default: Option<i64>) -> Result<Option<i64>, EnvParseError> {
        self.source
            .var(name)
            .map_or(Ok(default), |raw| int_from_raw(name, raw).map(Some))
    }

    /// Float variable.
    pub fn get_float(&self, name: &str, default: Option<f64>) -> Result<Option<f64>, EnvParseError> {
        self.source
            .var(name)
            .map_or(Ok(default), |raw| float_from_raw(name, raw).map(Some))
    }

    /// Raw string, verbatim.
    pub fn get_str(&self, name: &str, default: Option<&str>) -> Option<String> {
        self.source
            .var(name)
            .or_else(|| default.map(ToOwned::to_owned))
    }

    /// Path with `$VAR`, `${VAR}` and leading `~` expanded.
    ///
    /// The default is returned as-is when the variable is unset.
    pub fn get_path(&self, name: &str, default: Option<&Path>) -> Option<PathBuf> {
        match self.source.var(name) {
            None => default.map(Path::to_path_buf),
            Some(raw) => Some(self.path_from_raw(&raw)),
        }
    }

    /// List split on `,`.
    pub fn get_list(&self, name: &str, default: Option<Vec<String>>) -> Vec<String> {
        self.get_list_with(name, default, DEFAULT_ITEM_SEPARATOR)
    }

    /// List split on `separator`; order and duplicates are kept.
    pub fn get_list_with(
        &self,
        name: &str,
        default: Option<Vec<String>>,
        separator: char,
    ) -> Vec<String> {
        match self.source.var(name) {
            None => default.unwrap_or_default(),
            Some(raw) => list_from_raw(&raw, separator),
        }
    }

    /// Tuple split on `,`.
    pub fn get_tuple(&self, name: &str, default: Option<Box<[String]>>) -> Box<[String]> {
        self.get_tuple_with(name, default, DEFAULT_ITEM_SEPARATOR)
    }

    /// Tuple split on `separator`.
    pub fn get_tuple_with(
        &self,
        name: &str,
        default: Option<Box<[String]>>,
        separator: char,
    ) -> Box<[String]> {
        match self.source.var(name) {
            None => default.unwrap_or_default(),
            Some(raw) => list_from_raw(&raw, separator).into_boxed_slice(),
        }
    }

    /// Set split on `,`.
    pub fn get_set(&self, name: &str, default: Option<BTreeSet<String>>) -> BTreeSet<String> {
        self.get_set_with(name, default, DEFAULT_ITEM_SEPARATOR)
    }

    /// Set split on `separator`; duplicates collapse.
    pub fn get_set_with(
        &self,
        name: &str,
        default: Option<BTreeSet<String>>,
        separator: char,
    ) -> BTreeSet<String> {
        match self.source.var(name) {
            None => default.unwrap_or_default(),
            Some(raw) => set_from_raw(&raw, separator),
        }
    }

    /// Dict of `k=v` items split on `,`.
    pub fn get_dict(
        &self,
        name: &str,
        default: Option<BTreeMap<String, String>>,
    ) -> BTreeMap<String, String> {
        self.get_dict_with(name, default, DEFAULT_ITEM_SEPARATOR, DEFAULT_KV_SEPARATOR)
    }

    /// Dict with explicit separators.
    ///
    /// Malformed items do not fail the call: after a strict parse fails, a
    /// second pass skips them and a warning is logged.
    pub fn get_dict_with(
        &self,
        name: &str,
        default: Option<BTreeMap<String, String>>,
        item_separator: char,
        kv_separator: char,
    ) -> BTreeMap<String, String> {
        match self.source.var(name) {
            None => default.unwrap_or_default(),
            Some(raw) => self.dict_from_raw(name, &raw, item_separator, kv_separator),
        }
    }

    /// Dict that fails on the first malformed item instead of skipping it.
    pub fn get_dict_strict(
        &self,
        name: &str,
        default: Option<BTreeMap<String, String>>,
    ) -> Result<BTreeMap<String, String>, EnvParseError> {
        let Some(raw) = self.source.var(name) else {
            return Ok(default.unwrap_or_default());
        };
        parse_dict_strict(&raw, DEFAULT_ITEM_SEPARATOR, DEFAULT_KV_SEPARATOR).map_err(|entry| {
            EnvParseError::InvalidDict {
                var: name.into(),
                value: raw.clone(),
                entry: entry.0,
            }
        })
    }

    /// Variable that must be set.
    ///
    /// Absence fails with a `required` error whatever the caller would have
    /// used as a default. Without a `kind` the raw string is returned;
    /// collection kinds use the default separators.
    pub fn require(&self, name: &str, kind: Option<EnvKind>) -> Result<EnvValue, EnvParseError> {
        let raw = self
            .source
            .var(name)
            .ok_or_else(|| EnvParseError::Missing { var: name.into() })?;

        let Some(kind) = kind else {
            return Ok(EnvValue::Str(raw));
        };

        let value = match kind {
            EnvKind::Bool => EnvValue::Bool(self.bool_from_raw(name, raw)?),
            EnvKind::Int => EnvValue::Int(int_from_raw(name, raw)?),
            EnvKind::Float => EnvValue::Float(float_from_raw(name, raw)?),
            EnvKind::Str => EnvValue::Str(raw),
            EnvKind::Path => EnvValue::Path(self.path_from_raw(&raw)),
            EnvKind::ListOf => EnvValue::List(list_from_raw(&raw, DEFAULT_ITEM_SEPARATOR)),
            EnvKind::TupleOf => EnvValue::Tuple(
                list_from_raw(&raw, DEFAULT_ITEM_SEPARATOR).into_boxed_slice(),
            ),
            EnvKind::SetOf => EnvValue::Set(set_from_raw(&raw, DEFAULT_ITEM_SEPARATOR)),
            EnvKind::DictOf => EnvValue::Dict(self.dict_from_raw(
                name,
                &raw,
                DEFAULT_ITEM_SEPARATOR,
                DEFAULT_KV_SEPARATOR,
            )),
        };
        Ok(value)
    }

    fn bool_from_raw(&self, name: &str, raw: String) -> Result<Option<bool>, EnvParseError> {
        if raw.trim().is_empty() {
            self.logger.warn(
                "env.blank_bool",
                "boolean env var is set but blank; treating as unset value",
                Some(log_fields([("env_var", name)])),
            );
            return Ok(None);
        }

        parse_bool_literal(&raw)
            .map(Some)
            .ok_or_else(|| EnvParseError::InvalidBool {
                var: name.into(),
                value: raw,
            })
    }

    fn path_from_raw(&self, raw: &str) -> PathBuf {
        let home = self
            .source
            .var("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir);
        expand_path(raw, |name| self.source.var(name), home)
    }

    fn dict_from_raw(
        &self,
        name: &str,
        raw: &str,
        item_separator: char,
        kv_separator: char,
    ) -> BTreeMap<String, String> {
        match parse_dict_strict(raw, item_separator, kv_separator) {
            Ok(map) => map,
            Err(_) => {
                let preview = preview_value(name, raw, PREVIEW_CHARS);
                self.logger.warn(
                    "env.dict_fallback",
                    "dict env var has malformed items; skipping them",
                    Some(log_fields([("env_var", name), ("preview", preview.as_str())])),
                );
                parse_dict_lenient(raw, item_separator, kv_separator)
            },
        }
    }
}

fn int_from_raw(name: &str, raw: String) -> Result<i64, EnvParseError> {
    parse_int_literal(&raw).ok_or_else(|| EnvParseError::InvalidInt {
        var: name.into(),
        value: raw,
    })
}

fn float_from_raw(name: &str, raw: String) -> Result<f64, EnvParseError> {
    parse_float_literal(&raw).ok_or_else(|| EnvParseError::InvalidFloat {
        var: name.into(),
        value: raw,
    })
}

fn list_from_raw(raw: &str, separator: char) -> Vec<String> {
    split_items(raw, separator).map(ToOwned::to_owned).collect()
}

fn set_from_raw(raw: &str, separator: char) -> BTreeSet<String> {
    split_items(raw, separator).map(ToOwned::to_owned).collect()
}
