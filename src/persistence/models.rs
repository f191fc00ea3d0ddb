//! Row types for the `posts` table.

use serde::Serialize;

/// A stored blog post.
///
/// `id` is always assigned by the database (`SERIAL`); the application never
/// chooses one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BlogPost {
    /// Database-generated identifier.
    pub id: i32,
    /// Post title.
    pub title: String,
    /// Post body.
    pub description: String,
}
