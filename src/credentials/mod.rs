//! Credential resolution: turns environment state into connection parameters.
//!
//! Two sources are supported, selected per connection attempt:
//!
//! ```text
//! service-binding variable empty?
//!     ├── yes → discrete POSTGRESQL_* variables      (CredentialSource::EnvVars)
//!     └── no  → JSON service catalog in that variable (CredentialSource::PlatformPayload)
//! ```
//!
//! Nothing is cached: every call re-reads the environment.

pub mod env;
pub mod matcher;
pub mod payload;
pub mod resolver;
pub mod ssl_mode;

pub use env::{EnvSource, ProcessEnv};
pub use matcher::ServiceKeyMatcher;
pub use resolver::{CredentialResolver, CredentialSource, Credentials, ResolverSettings};
pub use ssl_mode::SslMode;
