//! Policy dependency value types and input validation (PRD-41).
//!
//! A dependency edge records that an artifact (workflow, module, or template)
//! relies on a policy document. Edges are persisted by the storage layer; the
//! types here are storage-agnostic.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum allowed length of the free-text notes on a dependency edge.
pub const MAX_NOTES_LENGTH: u64 = 2000;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of artifact that can depend on a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependentType {
    Workflow,
    Module,
    Template,
}

impl DependentType {
    /// All accepted wire values, in documentation order.
    pub const NAMES: &'static [&'static str] = &["workflow", "module", "template"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependentType::Workflow => "workflow",
            DependentType::Module => "module",
            DependentType::Template => "template",
        }
    }

    /// Parse a wire value. `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "workflow" => Some(DependentType::Workflow),
            "module" => Some(DependentType::Module),
            "template" => Some(DependentType::Template),
            _ => None,
        }
    }

    /// Strength assumed when a caller registers a dependency without one.
    ///
    /// Workflows bind tightest to policy content; templates loosest.
    pub fn default_strength(&self) -> DependencyStrength {
        match self {
            DependentType::Workflow => DependencyStrength::Strong,
            DependentType::Module => DependencyStrength::Medium,
            DependentType::Template => DependencyStrength::Weak,
        }
    }
}

impl fmt::Display for DependentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative weight of how tightly a dependent relies on the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStrength {
    Strong,
    Medium,
    Weak,
}

impl DependencyStrength {
    /// All accepted wire values, in documentation order.
    pub const NAMES: &'static [&'static str] = &["strong", "medium", "weak"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyStrength::Strong => "strong",
            DependencyStrength::Medium => "medium",
            DependencyStrength::Weak => "weak",
        }
    }

    /// Parse a wire value. `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "strong" => Some(DependencyStrength::Strong),
            "medium" => Some(DependencyStrength::Medium),
            "weak" => Some(DependencyStrength::Weak),
            _ => None,
        }
    }
}

impl fmt::Display for DependencyStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// A registered dependency edge from a policy (or another artifact acting as
/// a source) to a dependent artifact.
///
/// The (`policy_id`, `dependent_type`, `dependent_id`) triple is unique.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyDependency {
    pub id: DbId,
    pub policy_id: DbId,
    pub dependent_type: DependentType,
    pub dependent_id: DbId,
    pub dependency_strength: DependencyStrength,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// Validated payload for inserting a new dependency edge.
#[derive(Debug, Clone)]
pub struct NewDependency {
    pub policy_id: DbId,
    pub dependent_type: DependentType,
    pub dependent_id: DbId,
    pub dependency_strength: DependencyStrength,
    pub notes: Option<String>,
}

/// Validated payload for updating an edge. Strength and notes are the only
/// mutable fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone)]
pub struct UpdateDependency {
    pub dependency_strength: Option<DependencyStrength>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Request inputs
// ---------------------------------------------------------------------------

/// Raw request body for registering a dependency.
///
/// Fields are optional at the wire level so [`validate_create_input`] can
/// report every missing field in a single validation error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateDependencyInput {
    pub dependent_type: Option<String>,
    pub dependent_id: Option<DbId>,
    pub dependency_strength: Option<String>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Raw request body for updating a dependency's strength or notes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDependencyInput {
    pub dependency_strength: Option<String>,
    #[validate(length(max = 2000, message = "notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a create request against the policy identified in the URL.
///
/// Presence of `dependent_type` and `dependent_id` is checked first so one
/// error can name all missing fields; enum values are parsed after that.
/// An omitted strength falls back to the per-type default, never null.
pub fn validate_create_input(
    policy_id: DbId,
    input: &CreateDependencyInput,
) -> Result<NewDependency, CoreError> {
    input
        .validate()
        .map_err(|err| CoreError::Validation(err.to_string()))?;

    if policy_id <= 0 {
        return Err(CoreError::Validation(
            "policy_id must be a positive identifier".to_string(),
        ));
    }

    let mut missing = Vec::new();
    if input.dependent_type.is_none() {
        missing.push("dependent_type");
    }
    if input.dependent_id.is_none() {
        missing.push("dependent_id");
    }
    let (raw_type, dependent_id) = match (input.dependent_type.as_deref(), input.dependent_id) {
        (Some(raw_type), Some(dependent_id)) => (raw_type, dependent_id),
        _ => {
            return Err(CoreError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
    };

    let dependent_type = DependentType::parse(raw_type).ok_or_else(|| {
        CoreError::Validation(format!(
            "Invalid dependent_type '{raw_type}'. Must be one of: {}",
            DependentType::NAMES.join(", ")
        ))
    })?;

    let dependency_strength = match input.dependency_strength.as_deref() {
        Some(raw) => DependencyStrength::parse(raw).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid dependency_strength '{raw}'. Must be one of: {}",
                DependencyStrength::NAMES.join(", ")
            ))
        })?,
        None => dependent_type.default_strength(),
    };

    Ok(NewDependency {
        policy_id,
        dependent_type,
        dependent_id,
        dependency_strength,
        notes: input.notes.clone(),
    })
}

/// Validate an update request. At least one mutable field must be present.
pub fn validate_update_input(input: &UpdateDependencyInput) -> Result<UpdateDependency, CoreError> {
    input
        .validate()
        .map_err(|err| CoreError::Validation(err.to_string()))?;

    if input.dependency_strength.is_none() && input.notes.is_none() {
        return Err(CoreError::Validation(
            "At least one of dependency_strength, notes must be provided".to_string(),
        ));
    }

    let dependency_strength = match input.dependency_strength.as_deref() {
        Some(raw) => Some(DependencyStrength::parse(raw).ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid dependency_strength '{raw}'. Must be one of: {}",
                DependencyStrength::NAMES.join(", ")
            ))
        })?),
        None => None,
    };

    Ok(UpdateDependency {
        dependency_strength,
        notes: input.notes.clone(),
    })
}
