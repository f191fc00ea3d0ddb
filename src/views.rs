//! Server-rendered HTML views.
//!
//! Templates live in `templates/` and are compiled into the binary by
//! askama. Each content template extends `base.html`, so the set of view
//! types below is the complete, immutable template registry.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::BlogError;
use crate::persistence::BlogPost;

/// Shared layout every view extends.
pub const LAYOUT: &str = "base.html";

#[derive(Debug, Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    posts: &'a [BlogPost],
}

#[derive(Debug, Template)]
#[template(path = "new.html")]
struct NewTemplate {
    page_title: &'static str,
}

/// A named view together with its model.
#[derive(Debug, Clone)]
pub enum View {
    /// Post listing.
    Index(Vec<BlogPost>),
    /// Empty submission form.
    New,
}

impl View {
    /// Returns the view's registry name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::New => "new",
        }
    }

    /// Renders the view composed with [`LAYOUT`].
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Render`] if template execution fails.
    pub fn render(&self) -> Result<String, BlogError> {
        let html = match self {
            Self::Index(posts) => IndexTemplate { posts }.render()?,
            Self::New => NewTemplate {
                page_title: "New Blog Post",
            }
            .render()?,
        };
        Ok(html)
    }
}

/// Renders `view` into an HTML response, or a 500 carrying the error text.
pub fn render(view: &View) -> Response {
    match view.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(view = view.name(), layout = LAYOUT, error = %e, "failed to render view");
            e.into_response()
        }
    }
}
