//! Repository for the `policy_dependencies` table (PRD-41).

use careops_core::types::DbId;
use sqlx::PgPool;

use crate::models::policy_dependency::PolicyDependencyRow;

/// Column list for policy_dependencies queries.
const DEPENDENCY_COLUMNS: &str = "id, source_id, dependent_type, dependent_id, \
    dependency_strength, notes, created_at, updated_at";

/// Provides CRUD operations for dependency edges.
pub struct DependencyRepo;

impl DependencyRepo {
    /// Insert a new edge, returning the created row.
    ///
    /// Violating `uq_policy_dependencies_triple` surfaces as a database
    /// error; the store adapter classifies it.
    pub async fn create(
        pool: &PgPool,
        source_id: DbId,
        dependent_type: &str,
        dependent_id: DbId,
        dependency_strength: &str,
        notes: Option<&str>,
    ) -> Result<PolicyDependencyRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO policy_dependencies
                (source_id, dependent_type, dependent_id, dependency_strength, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {DEPENDENCY_COLUMNS}"
        );
        sqlx::query_as::<_, PolicyDependencyRow>(&query)
            .bind(source_id)
            .bind(dependent_type)
            .bind(dependent_id)
            .bind(dependency_strength)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// List all edges for a given source, newest first.
    pub async fn list_for_source(
        pool: &PgPool,
        source_id: DbId,
    ) -> Result<Vec<PolicyDependencyRow>, sqlx::Error> {
        let query = format!(
            "SELECT {DEPENDENCY_COLUMNS} FROM policy_dependencies
             WHERE source_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PolicyDependencyRow>(&query)
            .bind(source_id)
            .fetch_all(pool)
            .await
    }

    /// Whether the exact (source, type, dependent) triple is registered.
    pub async fn exists(
        pool: &PgPool,
        source_id: DbId,
        dependent_type: &str,
        dependent_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM policy_dependencies
                WHERE source_id = $1 AND dependent_type = $2 AND dependent_id = $3
            )",
        )
        .bind(source_id)
        .bind(dependent_type)
        .bind(dependent_id)
        .fetch_one(pool)
        .await?;
        Ok(exists.0)
    }

    /// Update strength and/or notes of one edge, scoped to its source.
    ///
    /// `None` arguments keep the stored value. Returns the updated row, or
    /// `None` when no edge with that id belongs to the source.
    pub async fn update(
        pool: &PgPool,
        source_id: DbId,
        id: DbId,
        dependency_strength: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Option<PolicyDependencyRow>, sqlx::Error> {
        let query = format!(
            "UPDATE policy_dependencies
             SET dependency_strength = COALESCE($3, dependency_strength),
                 notes = COALESCE($4, notes),
                 updated_at = now()
             WHERE id = $2 AND source_id = $1
             RETURNING {DEPENDENCY_COLUMNS}"
        );
        sqlx::query_as::<_, PolicyDependencyRow>(&query)
            .bind(source_id)
            .bind(id)
            .bind(dependency_strength)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete one edge, scoped to its source. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, source_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM policy_dependencies WHERE id = $2 AND source_id = $1",
        )
        .bind(source_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
