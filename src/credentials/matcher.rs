//! Rules for picking the PostgreSQL entry out of a service catalog.
//!
//! Catalog keys name the service offering and its version
//! (`a9s-postgresql10`, `a9s-postgresql17-xyz`, ...), so the rule is
//! configurable rather than a single literal.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Predicate over service-type keys in a binding payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceKeyMatcher {
    /// Key must equal the literal.
    Exact(String),
    /// Key must start with the literal.
    Prefix(String),
    /// Key must contain the literal anywhere.
    Contains(String),
}

impl ServiceKeyMatcher {
    /// Returns `true` if `key` satisfies this rule.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Self::Exact(lit) => key == lit,
            Self::Prefix(lit) => key.starts_with(lit.as_str()),
            Self::Contains(lit) => key.contains(lit.as_str()),
        }
    }
}

impl Default for ServiceKeyMatcher {
    fn default() -> Self {
        Self::Contains("postgresql".to_string())
    }
}

impl FromStr for ServiceKeyMatcher {
    type Err = ConfigError;

    /// Parses `exact:<key>`, `prefix:<key>` or `contains:<key>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidMatcher(s.to_string());
        let (kind, literal) = s.split_once(':').ok_or_else(invalid)?;
        if literal.is_empty() {
            return Err(invalid());
        }
        match kind {
            "exact" => Ok(Self::Exact(literal.to_string())),
            "prefix" => Ok(Self::Prefix(literal.to_string())),
            "contains" => Ok(Self::Contains(literal.to_string())),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ServiceKeyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(lit) => write!(f, "exact:{lit}"),
            Self::Prefix(lit) => write!(f, "prefix:{lit}"),
            Self::Contains(lit) => write!(f, "contains:{lit}"),
        }
    }
}
