//! PostgreSQL-backed implementation of the engine's storage contract (PRD-52).

use async_trait::async_trait;
use careops_core::dependency::{
    DependentType, NewDependency, PolicyDependency, UpdateDependency,
};
use careops_core::error::CoreError;
use careops_core::impact::store::{DependencyStore, DependentMetadata};
use careops_core::types::DbId;
use sqlx::PgPool;

use crate::models::dependent_artifact::DependentArtifact;
use crate::models::policy_dependency::PolicyDependencyRow;
use crate::repositories::{ArtifactRepo, DependencyRepo, PolicyRepo};

/// [`DependencyStore`] over the shared connection pool.
#[derive(Clone)]
pub struct PgDependencyStore {
    pool: PgPool,
}

impl PgDependencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Convert a sqlx failure into the domain's pass-through variant.
fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Dependency store query failed");
    CoreError::Internal(err.to_string())
}

/// Whether this error is a violation of the dependency triple's unique
/// constraint (PostgreSQL error code 23505).
fn is_triple_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some("uq_policy_dependencies_triple")
    } else {
        false
    }
}

#[async_trait]
impl DependencyStore for PgDependencyStore {
    async fn policy_exists(&self, policy_id: DbId) -> Result<bool, CoreError> {
        PolicyRepo::verify_exists(&self.pool, policy_id)
            .await
            .map_err(internal)
    }

    async fn list_dependencies(&self, source_id: DbId) -> Result<Vec<PolicyDependency>, CoreError> {
        let rows = DependencyRepo::list_for_source(&self.pool, source_id)
            .await
            .map_err(internal)?;
        rows.into_iter().map(PolicyDependencyRow::into_domain).collect()
    }

    async fn dependency_exists(
        &self,
        policy_id: DbId,
        dependent_type: DependentType,
        dependent_id: DbId,
    ) -> Result<bool, CoreError> {
        DependencyRepo::exists(&self.pool, policy_id, dependent_type.as_str(), dependent_id)
            .await
            .map_err(internal)
    }

    async fn insert_dependency(&self, dep: &NewDependency) -> Result<PolicyDependency, CoreError> {
        let result = DependencyRepo::create(
            &self.pool,
            dep.policy_id,
            dep.dependent_type.as_str(),
            dep.dependent_id,
            dep.dependency_strength.as_str(),
            dep.notes.as_deref(),
        )
        .await;

        match result {
            Ok(row) => row.into_domain(),
            // A concurrent writer won the race on the same triple; report it
            // exactly like the pre-insert check would have.
            Err(err) if is_triple_violation(&err) => Err(CoreError::DuplicateDependency {
                policy_id: dep.policy_id,
                dependent_type: dep.dependent_type,
                dependent_id: dep.dependent_id,
            }),
            Err(err) => Err(internal(err)),
        }
    }

    async fn update_dependency(
        &self,
        policy_id: DbId,
        id: DbId,
        update: &UpdateDependency,
    ) -> Result<Option<PolicyDependency>, CoreError> {
        let row = DependencyRepo::update(
            &self.pool,
            policy_id,
            id,
            update.dependency_strength.map(|s| s.as_str()),
            update.notes.as_deref(),
        )
        .await
        .map_err(internal)?;
        row.map(PolicyDependencyRow::into_domain).transpose()
    }

    async fn delete_dependency(&self, policy_id: DbId, id: DbId) -> Result<bool, CoreError> {
        DependencyRepo::delete(&self.pool, policy_id, id)
            .await
            .map_err(internal)
    }

    async fn get_dependent_metadata(
        &self,
        dependent_type: DependentType,
        dependent_id: DbId,
    ) -> Result<Option<DependentMetadata>, CoreError> {
        let artifact = ArtifactRepo::find(&self.pool, dependent_type.as_str(), dependent_id)
            .await
            .map_err(internal)?;
        Ok(artifact.map(DependentArtifact::into_metadata))
    }
}
