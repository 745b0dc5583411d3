//! Handlers for policy impact analysis (PRD-52).
//!
//! Read-only endpoints: the composed analysis, the bare dependency graph,
//! and the rendered impact report. Every response is recomputed from the
//! current dependency edges.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tokio_util::sync::CancellationToken;

use careops_core::error::CoreError;
use careops_core::types::DbId;
use careops_db::repositories::PolicyRepo;

use crate::error::{AppError, AppResult};
use crate::query::{GraphParams, ReportParams};
use crate::report::{self, ReportFormat};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/policies/{policy_id}/impact-analysis
///
/// Full composed analysis: dependency graph, risk assessment, change scope,
/// recommendations, and the pre-publish checklist. Publication gating on
/// `requires_approval` is the caller's responsibility; this endpoint only
/// reports it.
pub async fn get_impact_analysis(
    State(state): State<AppState>,
    Path(policy_id): Path<DbId>,
    Query(params): Query<GraphParams>,
) -> AppResult<impl IntoResponse> {
    // An abandoned request is cancelled by the dropped future; the token is
    // the seam for embedded callers and tests.
    let cancel = CancellationToken::new();
    let analysis = state
        .analyzer
        .get_impact_analysis(policy_id, params.max_depth, &cancel)
        .await?;

    tracing::info!(
        policy_id,
        risk_level = %analysis.risk_assessment.risk_level,
        requires_approval = analysis.risk_assessment.requires_approval,
        system_wide = analysis.change_scope.is_system_wide,
        "Impact analysis computed"
    );

    Ok(Json(DataResponse { data: analysis }))
}

/// GET /api/v1/policies/{policy_id}/dependency-graph
///
/// The bounded dependency graph only, without scoring or classification.
pub async fn get_dependency_graph(
    State(state): State<AppState>,
    Path(policy_id): Path<DbId>,
    Query(params): Query<GraphParams>,
) -> AppResult<impl IntoResponse> {
    let cancel = CancellationToken::new();
    let graph = state
        .analyzer
        .dependency_graph(policy_id, params.max_depth, &cancel)
        .await?;
    Ok(Json(DataResponse { data: graph }))
}

/// GET /api/v1/policies/{policy_id}/impact-report?format=json|html|pdf
///
/// The composed analysis rendered for human review. `json` and `html` render
/// in-process; `pdf` is delegated to the external reporting service.
pub async fn get_impact_report(
    State(state): State<AppState>,
    Path(policy_id): Path<DbId>,
    Query(params): Query<ReportParams>,
) -> AppResult<Response> {
    let raw = params.format.as_deref().unwrap_or("json");
    let format = ReportFormat::parse(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Unknown report format '{raw}'. Must be one of: {}",
            ReportFormat::NAMES.join(", ")
        ))
    })?;

    let policy = PolicyRepo::find_by_id(&state.pool, policy_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Policy",
            id: policy_id,
        }))?;

    let cancel = CancellationToken::new();
    let analysis = state
        .analyzer
        .get_impact_analysis(policy_id, None, &cancel)
        .await?;

    tracing::info!(policy_id, format = raw, "Impact report rendered");

    match format {
        ReportFormat::Json => Ok(Json(DataResponse { data: analysis }).into_response()),
        ReportFormat::Html => Ok(Html(report::render_html(&policy, &analysis)).into_response()),
        ReportFormat::Pdf => Ok((
            StatusCode::NOT_IMPLEMENTED,
            Json(serde_json::json!({
                "error": "PDF rendering is handled by the reporting service",
                "code": "PDF_NOT_AVAILABLE",
            })),
        )
            .into_response()),
    }
}
