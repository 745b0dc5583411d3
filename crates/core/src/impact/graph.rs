//! Bounded-depth dependency graph construction (PRD-52).
//!
//! Breadth-first traversal from a root policy over the dependency edges in
//! the store. Termination is guaranteed twice over: a visited set prevents
//! re-expansion on cyclic graphs, and `max_depth` bounds the frontier even
//! if the store kept producing fresh ids.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::dependency::{DependencyStrength, DependentType};
use crate::error::CoreError;
use crate::impact::store::DependencyStore;
use crate::types::DbId;

/// Traversal depth used when a caller does not specify one.
pub const DEFAULT_MAX_DEPTH: u32 = 5;

/// Hard ceiling on requested traversal depth.
pub const MAX_GRAPH_DEPTH: u32 = 20;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Kind of node in a dependency graph. The root is always a policy; every
/// other node is a dependent artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Policy,
    Workflow,
    Module,
    Template,
}

impl NodeKind {
    /// The artifact type this node carries, `None` for the policy root.
    pub fn dependent_type(&self) -> Option<DependentType> {
        match self {
            NodeKind::Policy => None,
            NodeKind::Workflow => Some(DependentType::Workflow),
            NodeKind::Module => Some(DependentType::Module),
            NodeKind::Template => Some(DependentType::Template),
        }
    }
}

impl From<DependentType> for NodeKind {
    fn from(value: DependentType) -> Self {
        match value {
            DependentType::Workflow => NodeKind::Workflow,
            DependentType::Module => NodeKind::Module,
            DependentType::Template => NodeKind::Template,
        }
    }
}

/// A node discovered during traversal.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: DbId,
    pub node_type: NodeKind,
    /// Shortest discovered distance from the root (first visit wins).
    pub depth: u32,
}

/// A directed edge from a source to one of its dependents.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub from_id: DbId,
    pub to_id: DbId,
    pub strength: DependencyStrength,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphMetadata {
    /// Maximum depth of any node actually included, never the requested cap.
    pub max_depth_reached: u32,
}

/// A derived, ephemeral, read-only view of the dependencies reachable from
/// one policy. Recomputed on every request.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub metadata: GraphMetadata,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Clamp an optional requested depth to the supported range.
pub fn effective_max_depth(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_MAX_DEPTH).min(MAX_GRAPH_DEPTH)
}

/// Build the dependency graph reachable from `root_policy_id`.
///
/// Traversal is breadth-first with the root at depth 0. A node that was
/// already discovered is never re-expanded, so cyclic dependency sets
/// terminate with one node per distinct reachable id (the closing edge of a
/// cycle is still recorded). Nodes at `max_depth` are included but
/// contribute no further edges.
///
/// An unknown root fails with [`CoreError::NotFound`]; a known root with no
/// dependents yields a single-node graph. Cancellation is checked once per
/// frontier node, not mid-expansion.
pub async fn build_graph(
    store: &dyn DependencyStore,
    root_policy_id: DbId,
    max_depth: u32,
    cancel: &CancellationToken,
) -> Result<DependencyGraph, CoreError> {
    if !store.policy_exists(root_policy_id).await? {
        return Err(CoreError::NotFound {
            entity: "Policy",
            id: root_policy_id,
        });
    }

    let mut nodes = vec![GraphNode {
        id: root_policy_id,
        node_type: NodeKind::Policy,
        depth: 0,
    }];
    let mut edges = Vec::new();
    let mut visited = HashSet::from([root_policy_id]);
    let mut frontier = VecDeque::from([(root_policy_id, 0u32)]);
    let mut max_depth_reached = 0;

    while let Some((source_id, depth)) = frontier.pop_front() {
        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        if depth == max_depth {
            continue;
        }

        for dep in store.list_dependencies(source_id).await? {
            edges.push(GraphEdge {
                from_id: source_id,
                to_id: dep.dependent_id,
                strength: dep.dependency_strength,
            });

            if visited.insert(dep.dependent_id) {
                let child_depth = depth + 1;
                nodes.push(GraphNode {
                    id: dep.dependent_id,
                    node_type: dep.dependent_type.into(),
                    depth: child_depth,
                });
                max_depth_reached = max_depth_reached.max(child_depth);
                frontier.push_back((dep.dependent_id, child_depth));
            }
        }
    }

    Ok(DependencyGraph {
        nodes,
        edges,
        metadata: GraphMetadata { max_depth_reached },
    })
}
