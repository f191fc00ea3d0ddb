//! Read access to environment variables.

use std::collections::HashMap;
use std::fmt;

/// Source of environment variables.
///
/// The server reads the real process environment through [`ProcessEnv`];
/// tests substitute a `HashMap<String, String>`.
pub trait EnvSource: fmt::Debug + Send + Sync {
    /// Returns the value of `key`, or `None` when it is unset or not UTF-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value of `key` only when it is set and non-empty.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
