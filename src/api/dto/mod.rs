//! Form payloads accepted by the HTML endpoints.

pub mod post_dto;

pub use post_dto::{CreatePostForm, DeletePostForm};
