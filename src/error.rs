//! Error types for credential resolution, database access, and rendering.
//!
//! [`ConfigError`] covers everything that can go wrong while turning the
//! process environment into connection parameters. [`BlogError`] is the
//! crate-wide error type; it terminates at the handler boundary, where it is
//! logged. Only render failures are ever turned into a client response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Missing or malformed configuration for a single connection attempt.
///
/// These are fatal to the connection being opened, never to the process.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("environment variable {0} missing")]
    MissingVar(&'static str),

    /// The port value is not an integer in `1..=65535`.
    #[error("invalid port {0:?}: expected an integer between 1 and 65535")]
    InvalidPort(String),

    /// The SSL mode value is not one PostgreSQL understands.
    #[error("invalid ssl mode {0:?}")]
    InvalidSslMode(String),

    /// The service-binding payload is not valid JSON of the expected shape.
    #[error("malformed service-binding payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// No service key in the binding payload satisfies the matcher.
    #[error("no service binding matches {0}")]
    NoMatchingService(String),

    /// The matching service key carries an empty binding list.
    #[error("service binding {0:?} has no entries")]
    EmptyBinding(String),

    /// A service-key matching rule could not be parsed.
    #[error("invalid service key rule {0:?}: expected exact:<key>, prefix:<key> or contains:<key>")]
    InvalidMatcher(String),
}

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum BlogError {
    /// Credentials could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The database could not be reached.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Opening the connection took longer than the configured bound.
    #[error("connection attempt timed out after {0} s")]
    ConnectTimeout(u64),

    /// A statement failed to execute or decode.
    #[error("query error: {0}")]
    Query(#[source] sqlx::Error),

    /// A template failed to render.
    #[error("render error: {0}")]
    Render(#[from] askama::Error),
}

impl BlogError {
    /// Returns the HTTP status code used when this error reaches a client.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        // Raw error text goes to the client; acceptable for template failures only.
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_names_the_variable() {
        let err = ConfigError::MissingVar("POSTGRESQL_HOST");
        assert!(err.to_string().contains("POSTGRESQL_HOST"));
    }

    #[test]
    fn config_error_converts_into_blog_error() {
        let err: BlogError = ConfigError::InvalidPort("abc".to_string()).into();
        assert!(matches!(err, BlogError::Config(ConfigError::InvalidPort(_))));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn into_response_carries_error_text() {
        let response = BlogError::ConnectTimeout(5).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
