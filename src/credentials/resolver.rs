//! Resolution of [`Credentials`] from the environment.

use std::fmt;
use std::sync::Arc;

use super::env::EnvSource;
use super::matcher::ServiceKeyMatcher;
use super::payload::{PortValue, select_binding};
use super::ssl_mode::SslMode;
use crate::error::ConfigError;

/// Placeholder printed wherever a password would otherwise appear.
pub const PASSWORD_MASK: &str = "******";

/// Default name of the platform service-binding variable.
pub const DEFAULT_BINDING_VAR: &str = "VCAP_SERVICES";

/// Discrete variables read in env-vars mode, in the order they are checked.
pub const ENV_HOST: &str = "POSTGRESQL_HOST";
/// Login role variable.
pub const ENV_USERNAME: &str = "POSTGRESQL_USERNAME";
/// Login password variable.
pub const ENV_PASSWORD: &str = "POSTGRESQL_PASSWORD";
/// Port variable.
pub const ENV_PORT: &str = "POSTGRESQL_PORT";
/// Database name variable.
pub const ENV_DATABASE: &str = "POSTGRESQL_DATABASE";
/// Optional SSL mode variable.
pub const ENV_SSLMODE: &str = "POSTGRESQL_SSLMODE";

/// Connection parameters for one connection attempt.
///
/// Never persisted and never shared between requests. `Debug` masks the
/// password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Database host.
    pub host: String,
    /// Login role.
    pub username: String,
    /// Login password.
    pub password: String,
    /// TCP port, `1..=65535`.
    pub port: u16,
    /// Database name.
    pub database: String,
    /// SSL negotiation mode.
    pub ssl_mode: SslMode,
}

impl Credentials {
    /// Returns a copy safe to log: the password is replaced by [`PASSWORD_MASK`].
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password: PASSWORD_MASK.to_string(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &PASSWORD_MASK)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user={} dbname={} password={} host={} port={} sslmode={}",
            self.username, self.database, PASSWORD_MASK, self.host, self.port, self.ssl_mode
        )
    }
}

/// Where credentials come from for a given attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Discrete `POSTGRESQL_*` variables.
    EnvVars,
    /// JSON service catalog taken from the binding variable.
    PlatformPayload(String),
}

/// Tunables for resolution that vary per deployment target.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Name of the platform service-binding variable.
    pub binding_var: String,
    /// Rule selecting the PostgreSQL key in the service catalog.
    pub service_matcher: ServiceKeyMatcher,
    /// SSL mode when `POSTGRESQL_SSLMODE` is absent.
    pub env_ssl_default: SslMode,
    /// SSL mode when a platform binding has no `sslmode`.
    pub platform_ssl_default: SslMode,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            binding_var: DEFAULT_BINDING_VAR.to_string(),
            service_matcher: ServiceKeyMatcher::default(),
            env_ssl_default: SslMode::Disable,
            platform_ssl_default: SslMode::Require,
        }
    }
}

/// Produces [`Credentials`] from an [`EnvSource`].
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    env: Arc<dyn EnvSource>,
    settings: ResolverSettings,
}

impl CredentialResolver {
    /// Creates a resolver over the given environment.
    #[must_use]
    pub fn new(env: Arc<dyn EnvSource>, settings: ResolverSettings) -> Self {
        Self { env, settings }
    }

    /// Returns the settings this resolver was built with.
    #[must_use]
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Decides which source applies right now.
    #[must_use]
    pub fn source(&self) -> CredentialSource {
        match self.env.non_empty(&self.settings.binding_var) {
            Some(payload) => CredentialSource::PlatformPayload(payload),
            None => CredentialSource::EnvVars,
        }
    }

    /// Resolves credentials from the current environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the missing variable, the invalid
    /// value, or the payload problem.
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        let result = match self.source() {
            CredentialSource::EnvVars => self.from_env_vars(),
            CredentialSource::PlatformPayload(raw) => self.from_payload(&raw),
        };
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "credential resolution failed");
        }
        result
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.env.non_empty(key).ok_or(ConfigError::MissingVar(key))
    }

    fn from_env_vars(&self) -> Result<Credentials, ConfigError> {
        let host = self.required(ENV_HOST)?;
        let username = self.required(ENV_USERNAME)?;
        let password = self.required(ENV_PASSWORD)?;
        let port_raw = self.required(ENV_PORT)?;
        let database = self.required(ENV_DATABASE)?;

        let port = PortValue::Text(port_raw).to_port()?;
        let ssl_mode = match self.env.non_empty(ENV_SSLMODE) {
            Some(raw) => raw.parse::<SslMode>()?,
            None => self.settings.env_ssl_default,
        };

        Ok(Credentials {
            host,
            username,
            password,
            port,
            database,
            ssl_mode,
        })
    }

    fn from_payload(&self, raw: &str) -> Result<Credentials, ConfigError> {
        let (key, binding) = select_binding(raw, &self.settings.service_matcher)?;
        tracing::debug!(service = %key, "using platform service binding");

        let port = binding.port.to_port()?;
        let ssl_mode = match binding.sslmode.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<SslMode>()?,
            None => self.settings.platform_ssl_default,
        };

        Ok(Credentials {
            host: binding.host,
            username: binding.username,
            password: binding.password,
            port,
            database: binding.name,
            ssl_mode,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<String, String> {
        [
            (ENV_HOST, "db.internal"),
            (ENV_USERNAME, "blog"),
            (ENV_PASSWORD, "s3cret"),
            (ENV_PORT, "5432"),
            (ENV_DATABASE, "posts"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn resolver(env: HashMap<String, String>) -> CredentialResolver {
        CredentialResolver::new(Arc::new(env), ResolverSettings::default())
    }

    #[test]
    fn resolves_from_env_vars_with_default_ssl_mode() {
        let r = resolver(full_env());
        assert_eq!(r.source(), CredentialSource::EnvVars);
        let Ok(creds) = r.resolve() else {
            panic!("expected credentials");
        };
        assert_eq!(
            creds,
            Credentials {
                host: "db.internal".to_string(),
                username: "blog".to_string(),
                password: "s3cret".to_string(),
                port: 5432,
                database: "posts".to_string(),
                ssl_mode: SslMode::Disable,
            }
        );
    }

    #[test]
    fn each_missing_variable_is_named() {
        for key in [ENV_HOST, ENV_USERNAME, ENV_PASSWORD, ENV_PORT, ENV_DATABASE] {
            let mut env = full_env();
            env.remove(key);
            let result = resolver(env).resolve();
            assert!(
                matches!(result, Err(ConfigError::MissingVar(k)) if k == key),
                "expected MissingVar({key})"
            );
        }
    }

    #[test]
    fn empty_variable_counts_as_missing() {
        let mut env = full_env();
        env.insert(ENV_PASSWORD.to_string(), String::new());
        assert!(matches!(
            resolver(env).resolve(),
            Err(ConfigError::MissingVar(ENV_PASSWORD))
        ));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let mut env = full_env();
        env.insert(ENV_PORT.to_string(), "fivefourthreetwo".to_string());
        assert!(matches!(resolver(env).resolve(), Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn explicit_ssl_mode_is_honoured() {
        let mut env = full_env();
        env.insert(ENV_SSLMODE.to_string(), "verify-full".to_string());
        let Ok(creds) = resolver(env).resolve() else {
            panic!("expected credentials");
        };
        assert_eq!(creds.ssl_mode, SslMode::VerifyFull);
    }

    #[test]
    fn platform_payload_takes_precedence() {
        let mut env = full_env();
        env.insert(
            DEFAULT_BINDING_VAR.to_string(),
            r#"{"a9s-postgresql17-xyz": [{"credentials": {"host":"h","username":"u","password":"p","port":5432,"name":"d"}}]}"#
                .to_string(),
        );
        let r = resolver(env);
        assert!(matches!(r.source(), CredentialSource::PlatformPayload(_)));
        let Ok(creds) = r.resolve() else {
            panic!("expected credentials");
        };
        assert_eq!(creds.host, "h");
        assert_eq!(creds.username, "u");
        assert_eq!(creds.password, "p");
        assert_eq!(creds.port, 5432);
        assert_eq!(creds.database, "d");
        assert_eq!(creds.ssl_mode, SslMode::Require);
    }

    #[test]
    fn platform_ssl_default_is_configurable() {
        let mut env = HashMap::new();
        env.insert(
            "SERVICES".to_string(),
            r#"{"pg": [{"credentials": {"host":"h","username":"u","password":"p","port":5432,"name":"d"}}]}"#
                .to_string(),
        );
        let settings = ResolverSettings {
            binding_var: "SERVICES".to_string(),
            service_matcher: ServiceKeyMatcher::Exact("pg".to_string()),
            env_ssl_default: SslMode::Disable,
            platform_ssl_default: SslMode::Prefer,
        };
        let r = CredentialResolver::new(Arc::new(env), settings);
        let Ok(creds) = r.resolve() else {
            panic!("expected credentials");
        };
        assert_eq!(creds.ssl_mode, SslMode::Prefer);
    }

    #[test]
    fn empty_binding_list_fails() {
        let mut env = HashMap::new();
        env.insert(
            DEFAULT_BINDING_VAR.to_string(),
            r#"{"a9s-postgresql17-xyz": []}"#.to_string(),
        );
        assert!(matches!(
            resolver(env).resolve(),
            Err(ConfigError::EmptyBinding(_))
        ));
    }

    #[test]
    fn password_never_rendered() {
        let Ok(creds) = resolver(full_env()).resolve() else {
            panic!("expected credentials");
        };
        assert!(!format!("{creds:?}").contains("s3cret"));
        assert!(!creds.to_string().contains("s3cret"));
        assert_eq!(creds.redacted().password, PASSWORD_MASK);
        assert_eq!(creds.redacted().host, creds.host);
    }
}
