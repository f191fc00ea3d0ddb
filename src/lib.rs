//! # blog-posts
//!
//! Minimal blog publishing service: visitors list posts, authors submit new
//! ones through an HTML form, and posts can be deleted one at a time or all
//! at once. Posts live in a single PostgreSQL table; pages are rendered on
//! the server.
//!
//! ## Architecture
//!
//! ```text
//! Browser (HTML forms)
//!     │
//!     ├── Handlers (api/)          ── Views (askama templates)
//!     │
//!     ├── PostRepository (persistence/)
//!     ├── Connector                 one connection per operation
//!     │
//!     ├── CredentialResolver (credentials/)
//!     │     ├── POSTGRESQL_* variables
//!     │     └── platform service-binding JSON
//!     │
//!     └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod credentials;
pub mod error;
pub mod persistence;
pub mod views;
