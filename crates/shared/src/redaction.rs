//! Secret detection and redaction utilities.
//!
//! Environment variable names and log field keys that look like secrets never
//! have their values echoed into error metadata or log previews.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

const PREVIEW_ELLIPSIS: &str = "...";

/// Checks if a key/variable name likely refers to a secret.
///
/// # Examples
///
/// ```
/// use foundation_shared::is_secret_key;
///
/// assert!(is_secret_key("API_KEY"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("LOG_LEVEL"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// Shortened, redaction-aware rendering of a raw value for log messages.
///
/// Values longer than `max_chars` characters are cut and suffixed with `...`.
pub fn preview_value(key: &str, value: &str, max_chars: usize) -> String {
    if is_secret_key(key) {
        return REDACTED.to_string();
    }

    let mut chars = value.char_indices();
    match chars.nth(max_chars) {
        None => value.to_string(),
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + PREVIEW_ELLIPSIS.len());
            preview.push_str(value.get(..cut).unwrap_or(value));
            preview.push_str(PREVIEW_ELLIPSIS);
            preview
        },
    }
}
