//! Environment lookup capability.

use std::collections::{BTreeMap, HashMap};

/// Read-only key/value view of an environment.
///
/// Getters never touch the process table directly; they read through this
/// trait so tests can inject a plain map.
pub trait EnvSource {
    /// Current value of `name`, or `None` when the variable is unset.
    fn var(&self, name: &str) -> Option<String>;

    /// Returns true when `name` is set (even to an empty string).
    fn contains(&self, name: &str) -> bool {
        self.var(name).is_some()
    }
}

/// The real process environment.
///
/// Values are read at call time; nothing is cached. Non-UTF-8 values are
/// converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var_os(name).map(|value| {
            value
                .into_string()
                .unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
        })
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<S: std::hash::BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_sources_distinguish_empty_from_unset() {
        let mut map = BTreeMap::new();
        map.insert("EMPTY".to_string(), String::new());

        assert!(map.contains("EMPTY"));
        assert_eq!(map.var("EMPTY").as_deref(), Some(""));
        assert!(!map.contains("MISSING"));
    }

    #[test]
    fn process_env_rejects_invalid_names() {
        assert_eq!(ProcessEnv.var(""), None);
        assert_eq!(ProcessEnv.var("A=B"), None);
    }

    #[test]
    fn process_env_reads_path() {
        let expected = std::env::var("PATH").ok();
        assert_eq!(ProcessEnv.var("PATH"), expected);
    }
}
