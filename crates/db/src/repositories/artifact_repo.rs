//! Repository for the `dependent_artifacts` registry.

use careops_core::types::DbId;
use sqlx::PgPool;

use crate::models::dependent_artifact::DependentArtifact;

/// Column list for dependent_artifacts queries.
const ARTIFACT_COLUMNS: &str =
    "id, artifact_type, name, department, is_critical, created_at, updated_at";

/// Provides read operations for the artifact metadata registry.
pub struct ArtifactRepo;

impl ArtifactRepo {
    /// Find an artifact by type and id.
    pub async fn find(
        pool: &PgPool,
        artifact_type: &str,
        id: DbId,
    ) -> Result<Option<DependentArtifact>, sqlx::Error> {
        let query = format!(
            "SELECT {ARTIFACT_COLUMNS} FROM dependent_artifacts
             WHERE id = $1 AND artifact_type = $2"
        );
        sqlx::query_as::<_, DependentArtifact>(&query)
            .bind(id)
            .bind(artifact_type)
            .fetch_optional(pool)
            .await
    }
}
