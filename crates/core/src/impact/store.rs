//! Storage capability required by the impact analysis engine.

use async_trait::async_trait;

use crate::dependency::{
    DependentType, NewDependency, PolicyDependency, UpdateDependency,
};
use crate::error::CoreError;
use crate::types::DbId;

/// Metadata the store knows about a dependent artifact.
///
/// Deliberately narrow: the scorer and classifier consume exactly these
/// three fields, regardless of what else the artifact registry records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependentMetadata {
    pub name: String,
    pub department: String,
    pub is_critical: bool,
}

/// Read/write contract the engine requires from its storage collaborator.
///
/// Implementations must make the duplicate check and insert atomic per
/// (`policy_id`, `dependent_type`, `dependent_id`) triple -- a single-row
/// unique constraint is sufficient. The engine performs no retries;
/// transient failures surface as [`CoreError::Internal`].
#[async_trait]
pub trait DependencyStore: Send + Sync {
    /// Whether a policy with this id exists.
    async fn policy_exists(&self, policy_id: DbId) -> Result<bool, CoreError>;

    /// All dependency edges whose source is the given id, newest first.
    ///
    /// The source may be a policy or an artifact that itself has dependents;
    /// transitive traversal relies on both answering here.
    async fn list_dependencies(&self, source_id: DbId) -> Result<Vec<PolicyDependency>, CoreError>;

    /// Whether the exact triple is already registered.
    async fn dependency_exists(
        &self,
        policy_id: DbId,
        dependent_type: DependentType,
        dependent_id: DbId,
    ) -> Result<bool, CoreError>;

    /// Insert a new edge, returning the stored record.
    ///
    /// Loses the race to a concurrent writer of the same triple with
    /// [`CoreError::DuplicateDependency`].
    async fn insert_dependency(&self, dep: &NewDependency) -> Result<PolicyDependency, CoreError>;

    /// Update strength and/or notes of the edge with this id, scoped to the
    /// given source policy. `None` when no such edge exists.
    async fn update_dependency(
        &self,
        policy_id: DbId,
        id: DbId,
        update: &UpdateDependency,
    ) -> Result<Option<PolicyDependency>, CoreError>;

    /// Delete the edge with this id, scoped to the given source policy.
    /// Returns whether a row was removed.
    async fn delete_dependency(&self, policy_id: DbId, id: DbId) -> Result<bool, CoreError>;

    /// Metadata for a dependent artifact, if the registry knows it.
    async fn get_dependent_metadata(
        &self,
        dependent_type: DependentType,
        dependent_id: DbId,
    ) -> Result<Option<DependentMetadata>, CoreError>;
}
