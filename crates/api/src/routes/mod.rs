pub mod health;
pub mod policy;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /policies/{policy_id}/dependencies                    list, create
/// /policies/{policy_id}/dependencies/{dependency_id}    update, delete
/// /policies/{policy_id}/impact-analysis                 composed analysis
/// /policies/{policy_id}/dependency-graph                graph only
/// /policies/{policy_id}/impact-report                   rendered report
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/policies", policy::router())
}
