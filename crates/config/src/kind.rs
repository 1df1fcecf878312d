//! Closed set of value shapes accepted by `EnvReader::require`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Shape to coerce a required variable into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvKind {
    /// Boolean literal.
    Bool,
    /// Base-10 integer.
    Int,
    /// Floating point number.
    Float,
    /// Raw string.
    Str,
    /// Filesystem path with variable and home expansion.
    Path,
    /// Comma separated list.
    ListOf,
    /// Comma separated, immutable sequence.
    TupleOf,
    /// Comma separated, deduplicated set.
    SetOf,
    /// Comma separated `key=value` pairs.
    DictOf,
}

/// A coerced environment value.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    /// Boolean; `None` when the variable was set but blank.
    Bool(Option<bool>),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Raw string.
    Str(String),
    /// Expanded path.
    Path(PathBuf),
    /// Ordered list.
    List(Vec<String>),
    /// Ordered, fixed-size sequence.
    Tuple(Box<[String]>),
    /// Deduplicated set.
    Set(BTreeSet<String>),
    /// Key/value map.
    Dict(BTreeMap<String, String>),
}

impl EnvValue {
    /// Boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => *value,
            _ => None,
        }
    }

    /// Integer payload.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Float payload.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// String payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Path payload.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(value) => Some(value),
            _ => None,
        }
    }

    /// Items of a list or tuple.
    #[must_use]
    pub fn as_items(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Set payload.
    #[must_use]
    pub const fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            Self::Set(items) => Some(items),
            _ => None,
        }
    }

    /// Map payload.
    #[must_use]
    pub const fn as_dict(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }
}
