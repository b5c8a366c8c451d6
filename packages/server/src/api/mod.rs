//! HTTP API
//!
//! # Architecture
//!
//! - `structure_endpoints`: health check and structure CRUD, tree, edit
//!   form and preview routes
//! - `auth`: bearer token verification and the `AuthenticatedUser`
//!   extractor
//! - `http_error`: JSON error bodies and status mapping
//!
//! # Security
//!
//! - Every structure route requires a valid HS256 bearer token
//! - CORS restricted to one configured origin, or localhost dev origins

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use structree_core::db::{DatabaseService, TursoStore};
use structree_core::StructureService;

use crate::config::ServerConfig;

pub mod auth;
mod http_error;
mod structure_endpoints;

pub use auth::{AuthenticatedUser, Claims, TokenVerifier};
pub use http_error::HttpError;
pub use structure_endpoints::{DELETED_MESSAGE, SAVED_MESSAGE, UPDATED_MESSAGE};

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub structures: Arc<StructureService>,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(structures: StructureService, tokens: TokenVerifier) -> Self {
        Self {
            structures: Arc::new(structures),
            tokens: Arc::new(tokens),
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(structure_endpoints::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Create CORS layer
///
/// Allows the configured origin, or common local frontend dev servers.
pub fn cors_layer(origin: Option<&HeaderValue>) -> CorsLayer {
    let origins: Vec<HeaderValue> = match origin {
        Some(origin) => vec![origin.clone()],
        None => vec![
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://localhost:5173"),
        ],
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(false)
}

/// Open the database and serve the API until the process stops
///
/// # Errors
///
/// Returns error if the database cannot be opened or the server fails to
/// bind or start.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let db = DatabaseService::new(config.database_path.clone()).await?;
    tracing::info!("Database: {}", db.db_path.display());

    let store = Arc::new(TursoStore::new(Arc::new(db)));
    let state = AppState::new(
        StructureService::new(store),
        TokenVerifier::new(&config.jwt_secret),
    );
    let app = create_router(state, cors_layer(config.cors_allow_origin.as_ref()));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Structree server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
