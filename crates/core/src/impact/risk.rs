//! Weighted risk scoring for policy changes (PRD-53).
//!
//! Scoring works over the policy's direct dependency edges: strength buckets
//! carry fixed weights, the total saturates at [`MAX_RISK_SCORE`], and fixed
//! thresholds map the score onto a risk level. Critical workflows add named
//! risk factors on top of the numeric score.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::dependency::{DependencyStrength, DependentType};
use crate::error::CoreError;
use crate::impact::store::DependencyStore;
use crate::types::DbId;

/// Score contribution of a single strong dependency.
pub const STRONG_WEIGHT: i64 = 12;

/// Score contribution of a single medium dependency.
pub const MEDIUM_WEIGHT: i64 = 5;

/// Score contribution of a single weak dependency.
pub const WEAK_WEIGHT: i64 = 1;

/// Score ceiling. Totals saturate here so large dependency counts cannot
/// produce meaningless values.
pub const MAX_RISK_SCORE: i64 = 100;

/// Scores below this are low risk.
pub const MEDIUM_RISK_THRESHOLD: i64 = 30;

/// Scores at or above this are high risk.
pub const HIGH_RISK_THRESHOLD: i64 = 60;

/// Scores at or above this are critical.
pub const CRITICAL_RISK_THRESHOLD: i64 = 80;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Risk classification of a proposed policy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classify a clamped score.
    pub fn from_score(score: i64) -> Self {
        if score >= CRITICAL_RISK_THRESHOLD {
            RiskLevel::Critical
        } else if score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Whether a publication at this level needs an approval record first.
    pub fn requires_approval(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an individual risk factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One named contributor to the overall risk picture.
#[derive(Debug, Clone, Serialize)]
pub struct RiskFactor {
    pub factor: String,
    pub severity: Severity,
}

/// Dependency counts bucketed by strength.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrengthBreakdown {
    pub strong: usize,
    pub medium: usize,
    pub weak: usize,
}

/// Derived, ephemeral risk assessment for one policy.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    /// Weighted score clamped to 0..=100.
    pub overall_risk_score: i64,
    pub risk_level: RiskLevel,
    /// Ordered: strength-count factors first, then critical workflows by name.
    pub risk_factors: Vec<RiskFactor>,
    pub requires_approval: bool,
    pub by_strength: StrengthBreakdown,
    pub by_type: BTreeMap<String, usize>,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Weighted score for a strength breakdown, clamped to 0..=[`MAX_RISK_SCORE`].
pub fn score_breakdown(breakdown: &StrengthBreakdown) -> i64 {
    let raw = breakdown.strong as i64 * STRONG_WEIGHT
        + breakdown.medium as i64 * MEDIUM_WEIGHT
        + breakdown.weak as i64 * WEAK_WEIGHT;
    raw.clamp(0, MAX_RISK_SCORE)
}

/// Assess the risk of changing the given policy.
///
/// Total over all valid policy ids: a policy with no dependencies scores 0
/// and classifies low, it is not an error. Output is deterministic for a
/// fixed dependency set.
pub async fn assess_risk(
    store: &dyn DependencyStore,
    policy_id: DbId,
) -> Result<RiskAssessment, CoreError> {
    let deps = store.list_dependencies(policy_id).await?;

    let mut by_strength = StrengthBreakdown::default();
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    for dep in &deps {
        match dep.dependency_strength {
            DependencyStrength::Strong => by_strength.strong += 1,
            DependencyStrength::Medium => by_strength.medium += 1,
            DependencyStrength::Weak => by_strength.weak += 1,
        }
        *by_type.entry(dep.dependent_type.as_str().to_string()).or_insert(0) += 1;
    }

    let overall_risk_score = score_breakdown(&by_strength);
    let risk_level = RiskLevel::from_score(overall_risk_score);

    let mut risk_factors = strength_factors(&by_strength);

    // Critical workflows are flagged by name, independent of the score.
    let mut critical_names = Vec::new();
    for dep in deps.iter().filter(|d| d.dependent_type == DependentType::Workflow) {
        if let Some(meta) = store
            .get_dependent_metadata(dep.dependent_type, dep.dependent_id)
            .await?
        {
            if meta.is_critical {
                critical_names.push(meta.name);
            }
        }
    }
    critical_names.sort();
    critical_names.dedup();
    risk_factors.extend(critical_names.into_iter().map(|name| RiskFactor {
        factor: format!("Critical Workflow Dependency: {name}"),
        severity: Severity::High,
    }));

    Ok(RiskAssessment {
        overall_risk_score,
        risk_level,
        requires_approval: risk_level.requires_approval(),
        risk_factors,
        by_strength,
        by_type,
    })
}

/// Transparency factors for non-empty strength buckets, in fixed order.
fn strength_factors(breakdown: &StrengthBreakdown) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    if breakdown.strong > 0 {
        factors.push(RiskFactor {
            factor: format!("{} strong dependency edge(s)", breakdown.strong),
            severity: Severity::High,
        });
    }
    if breakdown.medium > 0 {
        factors.push(RiskFactor {
            factor: format!("{} medium dependency edge(s)", breakdown.medium),
            severity: Severity::Medium,
        });
    }
    if breakdown.weak > 0 {
        factors.push(RiskFactor {
            factor: format!("{} weak dependency edge(s)", breakdown.weak),
            severity: Severity::Low,
        });
    }
    factors
}
