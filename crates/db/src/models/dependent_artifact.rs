//! Dependent artifact registry rows.

use careops_core::impact::store::DependentMetadata;
use careops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dependent_artifacts` registry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DependentArtifact {
    pub id: DbId,
    pub artifact_type: String,
    pub name: String,
    pub department: String,
    pub is_critical: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DependentArtifact {
    /// Reduce to the narrow metadata shape the analysis engine consumes.
    pub fn into_metadata(self) -> DependentMetadata {
        DependentMetadata {
            name: self.name,
            department: self.department,
            is_critical: self.is_critical,
        }
    }
}
