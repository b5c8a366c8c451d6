//! Structure Endpoints
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/structures` - List the caller's structures, newest first
//! - `POST /api/structures` - Create a structure
//! - `POST /api/structures/preview` - Tree of an unsaved submission
//! - `GET /api/structures/:id` - Get a structure with its nodes
//! - `PUT /api/structures/:id` - Replace a structure's label and nodes
//! - `DELETE /api/structures/:id` - Delete a structure
//! - `GET /api/structures/:id/tree` - Display tree of a structure
//! - `GET /api/structures/:id/edit` - Label-addressed edit form
//!
//! Every `/api/structures` route requires a bearer token.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use structree_core::{Structure, StructureInput, StructureService, TreeNode};

use crate::api::auth::AuthenticatedUser;
use crate::api::{AppState, HttpError};

pub const SAVED_MESSAGE: &str = "Structure saved successfully.";
pub const UPDATED_MESSAGE: &str = "Structure updated successfully.";
pub const DELETED_MESSAGE: &str = "Structure deleted successfully.";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Response to a successful create or update
#[derive(Debug, Serialize)]
pub struct StructureResponse {
    pub message: String,
    pub structure: Structure,
}

/// Response carrying only a confirmation message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check endpoint
///
/// ```bash
/// curl http://localhost:3001/api/health
/// ```
async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_structures(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
) -> Result<Json<Vec<Structure>>, HttpError> {
    Ok(Json(state.structures.list(&ctx).await?))
}

/// Create a new structure
///
/// ```bash
/// curl -X POST http://localhost:3001/api/structures \
///   -H "Authorization: Bearer $TOKEN" -H "Content-Type: application/json" \
///   -d '{"label":"Org","nodes":[{"label":"CEO","parent_id":null},{"label":"CTO","parent_id":"CEO"}]}'
/// ```
async fn create_structure(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(input): Json<StructureInput>,
) -> Result<(StatusCode, Json<StructureResponse>), HttpError> {
    let structure = state.structures.create(&ctx, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(StructureResponse {
            message: SAVED_MESSAGE.to_string(),
            structure,
        }),
    ))
}

async fn get_structure(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Structure>, HttpError> {
    Ok(Json(state.structures.get(&ctx, &id).await?))
}

/// Replace label and nodes; node ids in the body are ignored
async fn update_structure(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<String>,
    Json(input): Json<StructureInput>,
) -> Result<Json<StructureResponse>, HttpError> {
    let structure = state.structures.update(&ctx, &id, &input).await?;

    Ok(Json(StructureResponse {
        message: UPDATED_MESSAGE.to_string(),
        structure,
    }))
}

async fn delete_structure(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    state.structures.delete(&ctx, &id).await?;

    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}

/// `null` when the structure has no drawable nodes
async fn structure_tree(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Option<TreeNode>>, HttpError> {
    Ok(Json(state.structures.tree(&ctx, &id).await?))
}

async fn edit_form(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<StructureInput>, HttpError> {
    Ok(Json(state.structures.edit_form(&ctx, &id).await?))
}

/// Nothing is persisted; the token is still required
async fn preview_structure(
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Json(input): Json<StructureInput>,
) -> Json<Option<TreeNode>> {
    Json(StructureService::preview(&input))
}

/// Create router with all structure endpoints
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/structures",
            get(list_structures).post(create_structure),
        )
        .route("/api/structures/preview", post(preview_structure))
        .route(
            "/api/structures/:id",
            get(get_structure)
                .put(update_structure)
                .delete(delete_structure),
        )
        .route("/api/structures/:id/tree", get(structure_tree))
        .route("/api/structures/:id/edit", get(edit_form))
        .with_state(state)
}
