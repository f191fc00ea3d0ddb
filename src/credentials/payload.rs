//! Platform service-binding payload (Cloud Foundry `VCAP_SERVICES` shape).
//!
//! ```json
//! {
//!   "a9s-postgresql17": [
//!     { "credentials": { "host": "h", "username": "u", "password": "p",
//!                        "port": 5432, "name": "d", "sslmode": "require" } }
//!   ],
//!   "a9s-redis": [ ... ]
//! }
//! ```
//!
//! Only the selected entry is decoded against [`BindingCredentials`]; other
//! services in the catalog may carry arbitrary credential shapes.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::matcher::ServiceKeyMatcher;
use crate::error::ConfigError;

/// One binding entry of a service offering.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceBinding {
    /// Connection parameters issued by the platform.
    pub credentials: BindingCredentials,
}

/// The `credentials` sub-object of a PostgreSQL binding.
#[derive(Clone, Deserialize)]
pub struct BindingCredentials {
    /// Database host.
    pub host: String,
    /// Login role.
    pub username: String,
    /// Login password.
    pub password: String,
    /// TCP port, as a number or a numeric string.
    pub port: PortValue,
    /// Database name.
    pub name: String,
    /// Optional SSL mode; the resolver applies a default when absent.
    #[serde(default)]
    pub sslmode: Option<String>,
}

impl std::fmt::Debug for BindingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &super::resolver::PASSWORD_MASK)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}

/// Port as it appears in a payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// JSON number.
    Number(u64),
    /// JSON string holding a number.
    Text(String),
}

impl PortValue {
    /// Validates the port range `1..=65535`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if the value is not a nonzero
    /// 16-bit integer.
    pub fn to_port(&self) -> Result<u16, ConfigError> {
        let parsed = match self {
            Self::Number(n) => u16::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse::<u16>().ok(),
        };
        match parsed {
            Some(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::InvalidPort(match self {
                Self::Number(n) => n.to_string(),
                Self::Text(s) => s.clone(),
            })),
        }
    }
}

/// Picks the PostgreSQL binding out of a raw payload.
///
/// Keys are visited in lexicographic order and the first key accepted by
/// `matcher` wins; within that key the first binding entry is used.
///
/// # Errors
///
/// - [`ConfigError::MalformedPayload`] if the payload is not a JSON object
///   of lists, or the selected entry does not decode.
/// - [`ConfigError::NoMatchingService`] if no key matches.
/// - [`ConfigError::EmptyBinding`] if the matching key has no entries.
pub fn select_binding(
    raw: &str,
    matcher: &ServiceKeyMatcher,
) -> Result<(String, BindingCredentials), ConfigError> {
    let catalog: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(raw)?;

    let (key, entries) = catalog
        .into_iter()
        .find(|(key, _)| matcher.matches(key))
        .ok_or_else(|| ConfigError::NoMatchingService(matcher.to_string()))?;

    let first = entries
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::EmptyBinding(key.clone()))?;

    let binding: ServiceBinding = serde_json::from_value(first)?;
    Ok((key, binding.credentials))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "a9s-postgresql17-xyz": [
            {"credentials": {"host":"h","username":"u","password":"p","port":5432,"name":"d"}}
        ]
    }"#;

    #[test]
    fn selects_matching_binding() {
        let Ok((key, creds)) = select_binding(SAMPLE, &ServiceKeyMatcher::default()) else {
            panic!("expected a binding");
        };
        assert_eq!(key, "a9s-postgresql17-xyz");
        assert_eq!(creds.host, "h");
        assert_eq!(creds.username, "u");
        assert_eq!(creds.password, "p");
        assert_eq!(creds.name, "d");
        assert!(creds.sslmode.is_none());
        assert!(matches!(creds.port.to_port(), Ok(5432)));
    }

    #[test]
    fn ignores_unrelated_services_with_other_shapes() {
        let raw = r#"{
            "a9s-redis": [{"credentials": {"uri": "redis://x"}}],
            "a9s-postgresql10": [
                {"credentials": {"host":"db","username":"u","password":"p","port":"6432","name":"blog"}}
            ]
        }"#;
        let Ok((key, creds)) = select_binding(raw, &ServiceKeyMatcher::default()) else {
            panic!("expected a binding");
        };
        assert_eq!(key, "a9s-postgresql10");
        assert!(matches!(creds.port.to_port(), Ok(6432)));
    }

    #[test]
    fn first_matching_key_in_lexicographic_order_wins() {
        let raw = r#"{
            "b-postgresql": [{"credentials": {"host":"second","username":"u","password":"p","port":1,"name":"d"}}],
            "a-postgresql": [{"credentials": {"host":"first","username":"u","password":"p","port":1,"name":"d"}}]
        }"#;
        let Ok((_, creds)) = select_binding(raw, &ServiceKeyMatcher::default()) else {
            panic!("expected a binding");
        };
        assert_eq!(creds.host, "first");
    }

    #[test]
    fn empty_list_is_an_error() {
        let raw = r#"{"a9s-postgresql17-xyz": []}"#;
        let result = select_binding(raw, &ServiceKeyMatcher::default());
        assert!(matches!(result, Err(ConfigError::EmptyBinding(ref k)) if k == "a9s-postgresql17-xyz"));
    }

    #[test]
    fn no_match_is_an_error() {
        let matcher = ServiceKeyMatcher::Exact("a9s-postgresql10".to_string());
        let result = select_binding(SAMPLE, &matcher);
        assert!(matches!(result, Err(ConfigError::NoMatchingService(_))));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        for raw in ["not json", r#"["a9s-postgresql"]"#, r#"{"a9s-postgresql": [{"credentials": {}}]}"#] {
            let result = select_binding(raw, &ServiceKeyMatcher::default());
            assert!(matches!(result, Err(ConfigError::MalformedPayload(_))), "{raw}");
        }
    }

    #[test]
    fn port_range_is_enforced() {
        assert!(PortValue::Number(0).to_port().is_err());
        assert!(PortValue::Number(70_000).to_port().is_err());
        assert!(PortValue::Text("abc".to_string()).to_port().is_err());
        assert!(matches!(PortValue::Number(65_535).to_port(), Ok(65_535)));
    }

    #[test]
    fn debug_masks_password() {
        let Ok((_, creds)) = select_binding(SAMPLE, &ServiceKeyMatcher::default()) else {
            panic!("expected a binding");
        };
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("\"p\""));
        assert!(rendered.contains("******"));
    }
}
