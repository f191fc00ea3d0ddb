//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::persistence::PostRepository;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Blog post repository; opens a connection per call.
    pub posts: Arc<PostRepository>,
}

impl AppState {
    /// Wraps a repository for sharing across handlers.
    #[must_use]
    pub fn new(posts: PostRepository) -> Self {
        Self {
            posts: Arc::new(posts),
        }
    }
}
