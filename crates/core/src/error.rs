//! Domain error taxonomy shared across the workspace.

use crate::dependency::DependentType;
use crate::types::DbId;

/// Errors produced by the domain layer.
///
/// The API layer maps each variant onto an HTTP status; see
/// `careops-api/src/error.rs`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup failed.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed validation. The message names every offending field.
    #[error("{0}")]
    Validation(String),

    /// The (policy, dependent type, dependent id) triple is already registered.
    ///
    /// Creation is strict: callers change strength or notes through the update
    /// operation, never by re-creating the edge.
    #[error("Dependency ({policy_id}, {dependent_type}, {dependent_id}) already exists")]
    DuplicateDependency {
        policy_id: DbId,
        dependent_type: DependentType,
        dependent_id: DbId,
    },

    /// The caller cancelled the request mid-traversal. An abort, not a
    /// failure: nothing was computed and nothing needs to be rolled back.
    #[error("operation cancelled by caller")]
    Cancelled,

    /// A backing-store failure, passed through unmodified. The engine does
    /// not retry; retries are the store's responsibility.
    #[error("{0}")]
    Internal(String),
}
