//! Blog post handlers: list, form, create, delete, clear.
//!
//! Data-layer failures never reach the client. They are logged here and
//! the client gets the usual redirect or `OK`.

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::api::dto::{CreatePostForm, DeletePostForm};
use crate::app_state::AppState;
use crate::views::{self, View};

/// `GET /`: Render every post.
pub async fn list_posts(State(state): State<AppState>) -> Response {
    let posts = state.posts.list().await;
    views::render(&View::Index(posts))
}

/// `GET /blog-posts/new`: Render the submission form.
pub async fn new_post() -> Response {
    views::render(&View::New)
}

/// `POST /blog-posts/create`: Insert a post, then `302` back to `/`.
pub async fn create_post(
    State(state): State<AppState>,
    form: Result<Form<CreatePostForm>, FormRejection>,
) -> Response {
    match form {
        Ok(Form(form)) => {
            if let Err(e) = state.posts.insert(&form.title, &form.description).await {
                tracing::warn!(
                    title_len = form.title.len(),
                    description_len = form.description.len(),
                    error = %e,
                    "failed to create blog post"
                );
            }
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected create form");
        }
    }

    found("/")
}

/// `POST /blog-posts/delete`: Delete one post, then `303` back to `/`.
pub async fn delete_post(
    State(state): State<AppState>,
    form: Result<Form<DeletePostForm>, FormRejection>,
) -> Redirect {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected delete form");
            return Redirect::to("/");
        }
    };

    match form.post_id() {
        Ok(id) => {
            if let Err(e) = state.posts.delete_by_id(id).await {
                tracing::warn!(post_id = id, error = %e, "failed to delete blog post");
            }
        }
        Err(e) => {
            tracing::warn!(post_id = %form.raw_post_id, error = %e, "invalid post id");
        }
    }

    Redirect::to("/")
}

/// `GET|POST /clear`: Remove every post and answer `OK`.
pub async fn clear_posts(State(state): State<AppState>) -> impl IntoResponse {
    state.posts.delete_all().await;
    (StatusCode::OK, "OK")
}

/// `302 Found` to `location`. axum's [`Redirect`] only offers 303/307/308.
fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Blog post routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts))
        .route("/blog-posts/new", get(new_post))
        .route("/blog-posts/create", post(create_post))
        .route("/blog-posts/delete", post(delete_post))
        .route("/clear", get(clear_posts).post(clear_posts))
}
