//! Persistence layer: connections, schema bootstrap, and the posts table.
//!
//! Every operation opens its own [`sqlx::PgConnection`] through
//! [`connection::Connector`] and closes it before returning. There is no
//! pool and no state kept between requests.

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

pub use connection::Connector;
pub use models::BlogPost;
pub use repository::PostRepository;
