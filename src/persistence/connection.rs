//! Connection factory: credentials in, open `PgConnection` out.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::credentials::{CredentialResolver, Credentials};
use crate::error::BlogError;

/// Opens one database connection per call.
///
/// Credentials are resolved on every [`Connector::connect`], so changes to
/// the environment apply to the next request.
#[derive(Debug, Clone)]
pub struct Connector {
    resolver: CredentialResolver,
    connect_timeout: Option<Duration>,
}

impl Connector {
    /// Creates a connector. `connect_timeout` of `None` waits indefinitely.
    #[must_use]
    pub fn new(resolver: CredentialResolver, connect_timeout: Option<Duration>) -> Self {
        Self {
            resolver,
            connect_timeout,
        }
    }

    /// Returns the credential resolver.
    #[must_use]
    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    /// Resolves credentials and opens a connection.
    ///
    /// The caller owns the returned connection and must hand it back to
    /// [`Connector::release`].
    ///
    /// # Errors
    ///
    /// - [`BlogError::Config`] if credentials cannot be resolved.
    /// - [`BlogError::ConnectTimeout`] if the configured bound elapses.
    /// - [`BlogError::Connection`] if the server refuses or is unreachable.
    pub async fn connect(&self) -> Result<PgConnection, BlogError> {
        let credentials = self.resolver.resolve()?;
        tracing::debug!(
            host = %credentials.host,
            port = credentials.port,
            database = %credentials.database,
            username = %credentials.username,
            ssl_mode = %credentials.ssl_mode,
            "connecting to postgres"
        );

        let options = connect_options(&credentials);
        let connecting = PgConnection::connect_with(&options);
        let result = match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, connecting)
                .await
                .map_err(|_| BlogError::ConnectTimeout(limit.as_secs()))?,
            None => connecting.await,
        };

        result.map_err(BlogError::Connection)
    }

    /// Closes a connection obtained from [`Connector::connect`].
    ///
    /// Close failures are logged; the connection is gone either way.
    pub async fn release(conn: PgConnection) {
        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close database connection");
        }
    }
}

/// Builds sqlx connect options from resolved credentials.
#[must_use]
pub fn connect_options(credentials: &Credentials) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&credentials.host)
        .port(credentials.port)
        .username(&credentials.username)
        .password(&credentials.password)
        .database(&credentials.database)
        .ssl_mode(credentials.ssl_mode.into())
        .application_name(env!("CARGO_PKG_NAME"))
}
