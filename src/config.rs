//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: settings come from the environment (or a `.env`
//! file via `dotenvy`). Database credentials are deliberately NOT part of
//! this struct; they are resolved per connection by
//! [`crate::credentials::CredentialResolver`].

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::credentials::{EnvSource, ProcessEnv, ResolverSettings, ServiceKeyMatcher, SslMode};
use crate::credentials::resolver::DEFAULT_BINDING_VAR;
use crate::error::ConfigError;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Static-file root used outside platform mode.
const CONTAINER_APP_DIR: &str = "/app";

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to (`0.0.0.0:$PORT`).
    pub listen_addr: SocketAddr,

    /// Directory served under `/public`.
    pub public_dir: PathBuf,

    /// Credential resolution settings.
    pub resolver: ResolverSettings,

    /// Bound on opening a single database connection; `None` waits forever.
    pub connect_timeout: Option<Duration>,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` first to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `PORT`, `SERVICE_KEY_MATCH`,
    /// `ENV_SSLMODE_DEFAULT` or `PLATFORM_SSLMODE_DEFAULT` is set to an
    /// invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(&ProcessEnv)
    }

    /// Loads configuration from an arbitrary [`EnvSource`].
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_source(env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let port = match env.non_empty("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };
        let listen_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let defaults = ResolverSettings::default();
        let binding_var = env
            .non_empty("SERVICE_BINDING_VAR")
            .unwrap_or_else(|| DEFAULT_BINDING_VAR.to_string());
        let service_matcher = match env.non_empty("SERVICE_KEY_MATCH") {
            Some(raw) => raw.parse::<ServiceKeyMatcher>()?,
            None => defaults.service_matcher,
        };
        let env_ssl_default = match env.non_empty("ENV_SSLMODE_DEFAULT") {
            Some(raw) => raw.parse::<SslMode>()?,
            None => defaults.env_ssl_default,
        };
        let platform_ssl_default = match env.non_empty("PLATFORM_SSLMODE_DEFAULT") {
            Some(raw) => raw.parse::<SslMode>()?,
            None => defaults.platform_ssl_default,
        };

        let platform_mode = env.non_empty(&binding_var).is_some();
        let public_dir = env
            .non_empty("PUBLIC_DIR")
            .map_or_else(|| default_public_dir(platform_mode), PathBuf::from);

        let connect_timeout = match parse_env(env, "DATABASE_CONNECT_TIMEOUT_SECS", 5_u64) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(Self {
            listen_addr,
            public_dir,
            resolver: ResolverSettings {
                binding_var,
                service_matcher,
                env_ssl_default,
                platform_ssl_default,
            },
            connect_timeout,
            log_json: parse_env_bool(env, "LOG_JSON", false),
        })
    }
}

/// `<exe dir>/public` on the platform, `/app/public` in containers.
fn default_public_dir(platform_mode: bool) -> PathBuf {
    let base = if platform_mode {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        PathBuf::from(CONTAINER_APP_DIR)
    };
    base.join("public")
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(env: &dyn EnvSource, key: &str, default: T) -> T {
    env.var(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(env: &dyn EnvSource, key: &str, default: bool) -> bool {
    match env.var(key).map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
