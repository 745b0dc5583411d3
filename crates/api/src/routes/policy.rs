//! Route definitions for policy dependencies and impact analysis (PRD-41, PRD-52).

use axum::routing::get;
use axum::Router;

use crate::handlers::{dependencies, impact};
use crate::state::AppState;

/// Policy-scoped dependency and analysis routes, nested under `/policies`.
///
/// ```text
/// GET    /{policy_id}/dependencies                   list_dependencies
/// POST   /{policy_id}/dependencies                   create_dependency
/// PUT    /{policy_id}/dependencies/{dependency_id}   update_dependency
/// DELETE /{policy_id}/dependencies/{dependency_id}   delete_dependency
/// GET    /{policy_id}/impact-analysis                get_impact_analysis
/// GET    /{policy_id}/dependency-graph               get_dependency_graph
/// GET    /{policy_id}/impact-report                  get_impact_report
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{policy_id}/dependencies",
            get(dependencies::list_dependencies).post(dependencies::create_dependency),
        )
        .route(
            "/{policy_id}/dependencies/{dependency_id}",
            axum::routing::put(dependencies::update_dependency)
                .delete(dependencies::delete_dependency),
        )
        .route("/{policy_id}/impact-analysis", get(impact::get_impact_analysis))
        .route("/{policy_id}/dependency-graph", get(impact::get_dependency_graph))
        .route("/{policy_id}/impact-report", get(impact::get_impact_report))
}
