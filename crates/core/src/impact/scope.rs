//! Change-scope / blast-radius classification (PRD-54).
//!
//! Looks at which departments the direct and transitive dependents of a
//! policy belong to. The radius weights concentration: a department with a
//! cluster of dependent artifacts counts double, so a change touching three
//! nursing workflows reads wider than one touching three departments once.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::impact::graph::{self, DependencyGraph};
use crate::impact::store::DependencyStore;
use crate::types::DbId;

/// Radius contribution of a department holding a concentrated cluster.
pub const CONCENTRATED_DEPARTMENT_WEIGHT: u32 = 2;

/// Dependent-artifact count at which a department counts as concentrated.
pub const CONCENTRATION_THRESHOLD: usize = 3;

/// Radius above which a change is always system-wide.
pub const SYSTEM_WIDE_RADIUS: u32 = 7;

/// Department count above which a change is always system-wide.
pub const SYSTEM_WIDE_DEPARTMENTS: usize = 3;

/// Derived, ephemeral blast-radius classification for one policy.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeScope {
    pub is_system_wide: bool,
    /// Distinct affected departments, weighted by concentration.
    pub impact_radius: u32,
    /// Sorted for deterministic output.
    pub affected_departments: Vec<String>,
}

/// Classify the scope of a change given an already-built dependency graph.
///
/// Artifacts missing from the metadata registry contribute no department;
/// they still appear in the graph itself.
pub async fn classify_graph(
    store: &dyn DependencyStore,
    graph: &DependencyGraph,
) -> Result<ChangeScope, CoreError> {
    let mut dept_counts: BTreeMap<String, usize> = BTreeMap::new();
    for node in &graph.nodes {
        let Some(dependent_type) = node.node_type.dependent_type() else {
            continue; // the policy root has no department
        };
        if let Some(meta) = store.get_dependent_metadata(dependent_type, node.id).await? {
            *dept_counts.entry(meta.department).or_insert(0) += 1;
        }
    }

    let impact_radius = dept_counts
        .values()
        .map(|&count| {
            if count >= CONCENTRATION_THRESHOLD {
                CONCENTRATED_DEPARTMENT_WEIGHT
            } else {
                1
            }
        })
        .sum();
    let is_system_wide =
        impact_radius > SYSTEM_WIDE_RADIUS || dept_counts.len() > SYSTEM_WIDE_DEPARTMENTS;

    Ok(ChangeScope {
        is_system_wide,
        impact_radius,
        affected_departments: dept_counts.into_keys().collect(),
    })
}

/// Build the bounded graph for the policy and classify its scope.
///
/// Same no-dependency totality as risk scoring: an isolated policy yields an
/// empty department set, radius 0, not system-wide.
pub async fn calculate_change_scope(
    store: &dyn DependencyStore,
    policy_id: DbId,
    max_depth: u32,
    cancel: &CancellationToken,
) -> Result<ChangeScope, CoreError> {
    let graph = graph::build_graph(store, policy_id, max_depth, cancel).await?;
    classify_graph(store, &graph).await
}
