//! Composed impact analysis and dependency mutation rules (PRD-55).
//!
//! [`ImpactAnalyzer`] is the one entry point the API layer talks to. On the
//! read side it composes the graph builder, risk scorer, and scope
//! classifier into a single result; on the mutation side it owns the
//! validation and duplicate-prevention rules for dependency edges.

use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::dependency::{
    validate_create_input, validate_update_input, CreateDependencyInput, PolicyDependency,
    UpdateDependencyInput,
};
use crate::error::CoreError;
use crate::impact::graph::{self, DependencyGraph};
use crate::impact::risk::{self, RiskAssessment};
use crate::impact::scope::{self, ChangeScope};
use crate::impact::store::DependencyStore;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Guidance attached to an analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    /// Non-empty whenever the risk level requires approval.
    pub mitigation_strategies: Vec<String>,
}

/// One verification item a reviewer clears before a risky change ships.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub item: String,
    pub required: bool,
}

/// The full composed analysis for one policy. Derived and ephemeral;
/// recomputed from the current dependency edges on every request.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactAnalysis {
    pub dependency_graph: DependencyGraph,
    pub risk_assessment: RiskAssessment,
    pub change_scope: ChangeScope,
    pub recommendations: Recommendations,
    pub pre_publish_checklist: Vec<ChecklistItem>,
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Composes graph construction, risk scoring, and scope classification, and
/// owns the mutation rules for dependency edges.
///
/// Reads are side-effect free and may run concurrently; mutations rely on
/// the store's per-triple atomicity for the uniqueness invariant.
pub struct ImpactAnalyzer {
    store: Arc<dyn DependencyStore>,
}

impl ImpactAnalyzer {
    pub fn new(store: Arc<dyn DependencyStore>) -> Self {
        Self { store }
    }

    /// Register a new dependency edge.
    ///
    /// Fails with a validation error naming every missing field, `NotFound`
    /// for an unknown policy, and `DuplicateDependency` for a triple that is
    /// already registered. Strength defaults from the dependent type when
    /// omitted. Strict rejection, no upsert: changing strength goes through
    /// [`update_dependency`](Self::update_dependency).
    pub async fn create_dependency(
        &self,
        policy_id: DbId,
        input: &CreateDependencyInput,
    ) -> Result<PolicyDependency, CoreError> {
        let new = validate_create_input(policy_id, input)?;

        if !self.store.policy_exists(policy_id).await? {
            return Err(CoreError::NotFound {
                entity: "Policy",
                id: policy_id,
            });
        }

        if self
            .store
            .dependency_exists(new.policy_id, new.dependent_type, new.dependent_id)
            .await?
        {
            return Err(CoreError::DuplicateDependency {
                policy_id: new.policy_id,
                dependent_type: new.dependent_type,
                dependent_id: new.dependent_id,
            });
        }

        self.store.insert_dependency(&new).await
    }

    /// List the direct dependency edges of a policy, newest first.
    pub async fn list_dependencies(
        &self,
        policy_id: DbId,
    ) -> Result<Vec<PolicyDependency>, CoreError> {
        if !self.store.policy_exists(policy_id).await? {
            return Err(CoreError::NotFound {
                entity: "Policy",
                id: policy_id,
            });
        }
        self.store.list_dependencies(policy_id).await
    }

    /// Update strength and/or notes of one edge.
    pub async fn update_dependency(
        &self,
        policy_id: DbId,
        dependency_id: DbId,
        input: &UpdateDependencyInput,
    ) -> Result<PolicyDependency, CoreError> {
        let update = validate_update_input(input)?;
        self.store
            .update_dependency(policy_id, dependency_id, &update)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "PolicyDependency",
                id: dependency_id,
            })
    }

    /// Delete one edge explicitly.
    pub async fn delete_dependency(
        &self,
        policy_id: DbId,
        dependency_id: DbId,
    ) -> Result<(), CoreError> {
        if !self.store.delete_dependency(policy_id, dependency_id).await? {
            return Err(CoreError::NotFound {
                entity: "PolicyDependency",
                id: dependency_id,
            });
        }
        Ok(())
    }

    /// Build just the bounded dependency graph.
    pub async fn dependency_graph(
        &self,
        policy_id: DbId,
        max_depth: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<DependencyGraph, CoreError> {
        let depth = graph::effective_max_depth(max_depth);
        graph::build_graph(self.store.as_ref(), policy_id, depth, cancel).await
    }

    /// Full composed analysis: graph, risk, scope, and reviewer guidance.
    ///
    /// The graph is built once and shared with the scope classifier. Either
    /// the whole result is produced or the call fails; there is no partial
    /// output.
    pub async fn get_impact_analysis(
        &self,
        policy_id: DbId,
        max_depth: Option<u32>,
        cancel: &CancellationToken,
    ) -> Result<ImpactAnalysis, CoreError> {
        let depth = graph::effective_max_depth(max_depth);
        let store = self.store.as_ref();

        let dependency_graph = graph::build_graph(store, policy_id, depth, cancel).await?;
        let risk_assessment = risk::assess_risk(store, policy_id).await?;
        let change_scope = scope::classify_graph(store, &dependency_graph).await?;

        let recommendations = build_recommendations(&risk_assessment, &change_scope);
        let pre_publish_checklist = build_checklist(&risk_assessment, &change_scope);

        Ok(ImpactAnalysis {
            dependency_graph,
            risk_assessment,
            change_scope,
            recommendations,
            pre_publish_checklist,
        })
    }
}

// ---------------------------------------------------------------------------
// Guidance
// ---------------------------------------------------------------------------

fn build_recommendations(
    risk: &RiskAssessment,
    change_scope: &ChangeScope,
) -> Recommendations {
    let mut mitigation_strategies = Vec::new();
    if risk.requires_approval {
        mitigation_strategies
            .push("Notify owners of dependent workflows before publishing".to_string());
        mitigation_strategies
            .push("Schedule a staged rollout with a review checkpoint per department".to_string());
    }
    if risk.risk_level == risk::RiskLevel::Critical {
        mitigation_strategies
            .push("Prepare a rollback plan covering every strong dependency".to_string());
    }
    if change_scope.is_system_wide {
        mitigation_strategies
            .push("Coordinate the change window with all affected departments".to_string());
    }
    Recommendations {
        mitigation_strategies,
    }
}

/// One item per distinct risk factor plus one per affected department.
/// Every item is required when the risk level requires approval.
fn build_checklist(risk: &RiskAssessment, change_scope: &ChangeScope) -> Vec<ChecklistItem> {
    let required = risk.requires_approval;
    let mut items: Vec<ChecklistItem> = risk
        .risk_factors
        .iter()
        .map(|f| ChecklistItem {
            item: format!("Review risk factor: {}", f.factor),
            required,
        })
        .collect();
    items.extend(change_scope.affected_departments.iter().map(|dept| {
        ChecklistItem {
            item: format!("Confirm sign-off from the {dept} department"),
            required,
        }
    }));
    items
}
