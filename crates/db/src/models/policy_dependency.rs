//! Dependency edge rows (PRD-41).

use careops_core::dependency::{DependencyStrength, DependentType, PolicyDependency};
use careops_core::error::CoreError;
use careops_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `policy_dependencies` table.
///
/// Type and strength are TEXT columns guarded by CHECK constraints;
/// [`into_domain`](Self::into_domain) converts them to the domain enums.
#[derive(Debug, Clone, FromRow)]
pub struct PolicyDependencyRow {
    pub id: DbId,
    pub source_id: DbId,
    pub dependent_type: String,
    pub dependent_id: DbId,
    pub dependency_strength: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PolicyDependencyRow {
    /// Convert into the domain value type.
    ///
    /// A value the domain does not recognize means the row bypassed the
    /// CHECK constraints and is reported as an internal error rather than
    /// silently dropped.
    pub fn into_domain(self) -> Result<PolicyDependency, CoreError> {
        let dependent_type = DependentType::parse(&self.dependent_type).ok_or_else(|| {
            CoreError::Internal(format!(
                "unknown dependent_type '{}' in policy_dependencies row {}",
                self.dependent_type, self.id
            ))
        })?;
        let dependency_strength =
            DependencyStrength::parse(&self.dependency_strength).ok_or_else(|| {
                CoreError::Internal(format!(
                    "unknown dependency_strength '{}' in policy_dependencies row {}",
                    self.dependency_strength, self.id
                ))
            })?;
        Ok(PolicyDependency {
            id: self.id,
            policy_id: self.source_id,
            dependent_type,
            dependent_id: self.dependent_id,
            dependency_strength,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}
