//! Literal parsers behind the env getters.
//!
//! These work on raw strings only; reading the environment and reporting
//! failures with field names happens in [`crate::env`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Parse a boolean literal (`true|1|yes|on` / `false|0|no|off`, case-insensitive).
#[must_use]
pub fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a base-10 integer literal. Surrounding whitespace and `_` between digits are accepted.
#[must_use]
pub fn parse_int_literal(raw: &str) -> Option<i64> {
    let digits = strip_digit_separators(raw.trim())?;
    digits.parse::<i64>().ok()
}

/// Parse a float literal (`1.5`, `-2e3`, `inf`, `nan`, ...).
#[must_use]
pub fn parse_float_literal(raw: &str) -> Option<f64> {
    let digits = strip_digit_separators(raw.trim())?;
    digits.parse::<f64>().ok()
}

fn strip_digit_separators(input: &str) -> Option<Cow<'_, str>> {
    if !input.contains('_') {
        return Some(Cow::Borrowed(input));
    }

    let bytes = input.as_bytes();
    let mut output = String::with_capacity(input.len());
    for (index, ch) in input.char_indices() {
        if ch != '_' {
            output.push(ch);
            continue;
        }
        let before = index.checked_sub(1).and_then(|prev| bytes.get(prev));
        let after = bytes.get(index + 1);
        let between_digits = matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit());
        if !between_digits {
            return None;
        }
    }
    Some(Cow::Owned(output))
}

/// Split on `separator`, trim every piece and drop empty pieces.
pub fn split_items(raw: &str, separator: char) -> impl Iterator<Item = &str> {
    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

/// An item that has no key/value separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry(pub String);

impl fmt::Display for MalformedEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "malformed entry: {}", self.0)
    }
}

impl std::error::Error for MalformedEntry {}

/// Parse `k1=v1,k2=v2`, failing on the first item without a key/value separator.
///
/// Items split on the first `kv_separator`, so values may contain it.
pub fn parse_dict_strict(
    raw: &str,
    item_separator: char,
    kv_separator: char,
) -> Result<BTreeMap<String, String>, MalformedEntry> {
    let mut map = BTreeMap::new();
    for item in split_items(raw, item_separator) {
        let (key, value) = split_pair(item, kv_separator)
            .ok_or_else(|| MalformedEntry(item.to_string()))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Parse `k1=v1,k2=v2`, silently skipping items without a key/value separator.
#[must_use]
pub fn parse_dict_lenient(
    raw: &str,
    item_separator: char,
    kv_separator: char,
) -> BTreeMap<String, String> {
    split_items(raw, item_separator)
        .filter_map(|item| split_pair(item, kv_separator))
        .collect()
}

fn split_pair(item: &str, kv_separator: char) -> Option<(String, String)> {
    let (key, value) = item.split_once(kv_separator)?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

/// Expand `$NAME` / `${NAME}` references, then a leading `~`.
///
/// Unknown variables are left untouched. `~user` forms are not resolved.
pub fn expand_path<F>(raw: &str, lookup: F, home: Option<PathBuf>) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_vars(raw, &lookup);
    expand_home(&expanded, home)
}

/// Expand `$NAME` and `${NAME}` references using `lookup`.
pub fn expand_vars<F>(raw: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(dollar) = rest.find('$') {
        output.push_str(rest.get(..dollar).unwrap_or_default());
        let after = rest.get(dollar + 1..).unwrap_or_default();

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(close) => (braced.get(..close).unwrap_or_default(), close + 2),
                None => ("", 0),
            }
        } else {
            let len = after
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                .unwrap_or(after.len());
            (after.get(..len).unwrap_or_default(), len)
        };

        let reference = rest.get(dollar..dollar + 1 + consumed).unwrap_or("$");
        match Some(name).filter(|name| !name.is_empty()).and_then(&lookup) {
            Some(value) => output.push_str(&value),
            None => output.push_str(reference),
        }
        rest = rest.get(dollar + 1 + consumed..).unwrap_or_default();
    }

    output.push_str(rest);
    output
}

fn expand_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    let Some(tail) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    if !(tail.is_empty() || tail.starts_with('/')) {
        return PathBuf::from(path);
    }
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    let tail = tail.trim_start_matches('/');
    if tail.is_empty() {
        home
    } else {
        home.join(tail)
    }
}
