//! Startup schema bootstrap.

use super::connection::Connector;

/// DDL for the single `posts` table. Safe to run on every start.
pub const CREATE_POSTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS posts (\
     id SERIAL PRIMARY KEY, \
     title VARCHAR(256), \
     description VARCHAR(1024))";

/// Ensures the `posts` table exists.
///
/// Best effort: connection and DDL failures are logged and startup
/// continues with a degraded database.
pub async fn ensure_schema(connector: &Connector) {
    let mut conn = match connector.connect().await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!(error = %e, "failed to create connection; skipping schema setup");
            return;
        }
    };

    match sqlx::query(CREATE_POSTS_TABLE).execute(&mut conn).await {
        Ok(_) => tracing::info!("posts table ready"),
        Err(e) => tracing::warn!(error = %e, "failed to create posts table"),
    }

    Connector::release(conn).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_is_idempotent_and_bounded() {
        assert!(CREATE_POSTS_TABLE.contains("IF NOT EXISTS posts"));
        assert!(CREATE_POSTS_TABLE.contains("VARCHAR(256)"));
        assert!(CREATE_POSTS_TABLE.contains("VARCHAR(1024)"));
    }
}
