//! Data operations on the `posts` table.
//!
//! All statements bind user input as parameters; no value is ever spliced
//! into SQL text.

use sqlx::FromRow;
use sqlx::postgres::PgRow;

use super::connection::Connector;
use super::models::BlogPost;
use crate::error::BlogError;

const SELECT_POSTS: &str = "SELECT id, title, description FROM posts";
const INSERT_POST: &str = "INSERT INTO posts (title, description) VALUES ($1, $2) RETURNING id";
const DELETE_POST: &str = "DELETE FROM posts WHERE id = $1";
const DELETE_ALL_POSTS: &str = "DELETE FROM posts";

/// Repository for blog posts. Each call uses a fresh connection.
#[derive(Debug, Clone)]
pub struct PostRepository {
    connector: Connector,
}

impl PostRepository {
    /// Creates a repository on top of the given connector.
    #[must_use]
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }

    /// Returns the underlying connector.
    #[must_use]
    pub fn connector(&self) -> &Connector {
        &self.connector
    }

    /// Lists every post in whatever order the database returns them.
    ///
    /// Connection and query failures are logged and yield an empty list.
    /// Rows that fail to decode (e.g. a `NULL` title) are dropped.
    pub async fn list(&self) -> Vec<BlogPost> {
        let mut conn = match self.connector.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "failed to create connection");
                return Vec::new();
            }
        };

        tracing::debug!("collecting blog posts");
        let rows = sqlx::query(SELECT_POSTS).fetch_all(&mut conn).await;
        Connector::release(conn).await;

        match rows {
            Ok(rows) => decode_posts(&rows),
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch blog posts");
                Vec::new()
            }
        }
    }

    /// Inserts a post and returns its database-assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`BlogError`] if the connection cannot be opened or the
    /// insert fails (e.g. the title exceeds the column width).
    pub async fn insert(&self, title: &str, description: &str) -> Result<i32, BlogError> {
        let mut conn = self.connector.connect().await?;

        let result = sqlx::query_scalar::<_, i32>(INSERT_POST)
            .bind(title)
            .bind(description)
            .fetch_one(&mut conn)
            .await
            .map_err(BlogError::Query);
        Connector::release(conn).await;

        let id = result?;
        tracing::info!(post_id = id, "created blog post");
        Ok(id)
    }

    /// Deletes the post with the given id and returns the number of rows
    /// removed (`0` for an unknown id).
    ///
    /// # Errors
    ///
    /// Returns a [`BlogError`] if the connection cannot be opened or the
    /// statement fails.
    pub async fn delete_by_id(&self, id: i32) -> Result<u64, BlogError> {
        let mut conn = self.connector.connect().await?;

        let result = sqlx::query(DELETE_POST)
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(BlogError::Query);
        Connector::release(conn).await;

        let removed = result?.rows_affected();
        tracing::info!(post_id = id, removed, "deleted blog post");
        Ok(removed)
    }

    /// Deletes every post. Failures are logged, never returned.
    pub async fn delete_all(&self) {
        let mut conn = match self.connector.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(error = %e, "failed to create connection");
                return;
            }
        };

        let result = sqlx::query(DELETE_ALL_POSTS).execute(&mut conn).await;
        Connector::release(conn).await;

        match result {
            Ok(done) => tracing::info!(removed = done.rows_affected(), "cleared blog posts"),
            Err(e) => tracing::warn!(error = %e, "failed to clear blog posts"),
        }
    }
}

fn decode_posts(rows: &[PgRow]) -> Vec<BlogPost> {
    rows.iter()
        .filter_map(|row| match BlogPost::from_row(row) {
            Ok(post) => Some(post),
            Err(e) => {
                tracing::debug!(error = %e, "skipping undecodable row");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::credentials::{CredentialResolver, ResolverSettings};
    use crate::error::ConfigError;

    fn offline() -> PostRepository {
        let vars: HashMap<String, String> = HashMap::new();
        let resolver = CredentialResolver::new(Arc::new(vars), ResolverSettings::default());
        PostRepository::new(Connector::new(resolver, None))
    }

    #[tokio::test]
    async fn list_degrades_to_empty() {
        assert!(offline().list().await.is_empty());
    }

    #[tokio::test]
    async fn writes_surface_configuration_errors() {
        let repo = offline();
        assert!(matches!(
            repo.insert("t", "d").await,
            Err(BlogError::Config(ConfigError::MissingVar(_)))
        ));
        assert!(matches!(
            repo.delete_by_id(1).await,
            Err(BlogError::Config(ConfigError::MissingVar(_)))
        ));
    }

    #[tokio::test]
    async fn delete_all_swallows_errors() {
        offline().delete_all().await;
    }

    #[test]
    fn statements_use_bind_parameters() {
        assert!(INSERT_POST.contains("VALUES ($1, $2)"));
        assert!(DELETE_POST.ends_with("id = $1"));
        assert!(!SELECT_POSTS.contains("ORDER BY"));
    }
}
