//! Structree HTTP Server
//!
//! REST API over `structree-core`. Every structure route is scoped to the
//! user named by the request's bearer token.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven server configuration
//! - [`api`] - Router, authentication and endpoint handlers

pub mod api;
pub mod config;

pub use api::{create_router, start_server, AppState};
pub use config::ServerConfig;
