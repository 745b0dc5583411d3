//! Handlers for policy dependency registration (PRD-41).
//!
//! Provides endpoints for creating, listing, updating, and deleting the
//! dependency edges consumed by the impact analysis engine. Validation,
//! duplicate prevention, and strength defaulting live in the engine; these
//! handlers only translate HTTP.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use careops_core::dependency::{CreateDependencyInput, UpdateDependencyInput};
use careops_core::types::DbId;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/policies/{policy_id}/dependencies
///
/// Register a dependency edge from a policy to a dependent artifact.
/// Duplicate triples are rejected; an omitted strength derives from the
/// dependent type.
pub async fn create_dependency(
    State(state): State<AppState>,
    Path(policy_id): Path<DbId>,
    Json(input): Json<CreateDependencyInput>,
) -> AppResult<impl IntoResponse> {
    let dependency = state.analyzer.create_dependency(policy_id, &input).await?;

    tracing::info!(
        policy_id,
        dependent_type = %dependency.dependent_type,
        dependent_id = dependency.dependent_id,
        strength = %dependency.dependency_strength,
        "Dependency registered"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: dependency })))
}

/// GET /api/v1/policies/{policy_id}/dependencies
///
/// List the direct dependency edges of a policy, newest first.
pub async fn list_dependencies(
    State(state): State<AppState>,
    Path(policy_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let dependencies = state.analyzer.list_dependencies(policy_id).await?;
    Ok(Json(DataResponse { data: dependencies }))
}

/// PUT /api/v1/policies/{policy_id}/dependencies/{dependency_id}
///
/// Update the strength and/or notes of one edge. These are the only mutable
/// fields; re-pointing an edge means delete and re-create.
pub async fn update_dependency(
    State(state): State<AppState>,
    Path((policy_id, dependency_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateDependencyInput>,
) -> AppResult<impl IntoResponse> {
    let dependency = state
        .analyzer
        .update_dependency(policy_id, dependency_id, &input)
        .await?;

    tracing::info!(policy_id, dependency_id, "Dependency updated");

    Ok(Json(DataResponse { data: dependency }))
}

/// DELETE /api/v1/policies/{policy_id}/dependencies/{dependency_id}
///
/// Delete one edge explicitly.
pub async fn delete_dependency(
    State(state): State<AppState>,
    Path((policy_id, dependency_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    state
        .analyzer
        .delete_dependency(policy_id, dependency_id)
        .await?;

    tracing::info!(policy_id, dependency_id, "Dependency deleted");

    Ok(StatusCode::NO_CONTENT)
}
