//! Repository for the `policies` table.

use careops_core::types::DbId;
use sqlx::PgPool;

use crate::models::policy::Policy;

/// Column list for policies queries.
const POLICY_COLUMNS: &str = "id, title, status, created_at, updated_at";

/// Provides read operations for policy documents.
///
/// The impact engine only needs identity and header data; authoring is a
/// separate service.
pub struct PolicyRepo;

impl PolicyRepo {
    /// Whether a policy with the given id exists.
    pub async fn verify_exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM policies WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// Find a policy by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Policy>, sqlx::Error> {
        let query = format!("SELECT {POLICY_COLUMNS} FROM policies WHERE id = $1");
        sqlx::query_as::<_, Policy>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
