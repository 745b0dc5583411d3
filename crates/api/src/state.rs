use std::sync::Arc;

use careops_core::impact::analysis::ImpactAnalyzer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: careops_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Impact analysis engine over the Postgres-backed dependency store.
    pub analyzer: Arc<ImpactAnalyzer>,
}
