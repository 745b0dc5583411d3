//! Impact report formatting (PRD-56).
//!
//! JSON and HTML renderings of a composed impact analysis. PDF is a
//! recognized format name, but binary rendering belongs to the external
//! reporting service.

use careops_core::impact::analysis::ImpactAnalysis;
use careops_db::models::policy::Policy;

/// Output formats accepted by the impact-report endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Html,
    Pdf,
}

impl ReportFormat {
    /// All accepted `?format=` values, in documentation order.
    pub const NAMES: &'static [&'static str] = &["json", "html", "pdf"];

    /// Parse a `?format=` value. `None` for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "json" => Some(ReportFormat::Json),
            "html" => Some(ReportFormat::Html),
            "pdf" => Some(ReportFormat::Pdf),
            _ => None,
        }
    }
}

/// Render the analysis as a standalone HTML document.
///
/// Kept intentionally plain: headings, definition rows, and lists. Styling
/// is the consuming UI's concern.
pub fn render_html(policy: &Policy, analysis: &ImpactAnalysis) -> String {
    let risk = &analysis.risk_assessment;
    let scope = &analysis.change_scope;

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str(&format!(
        "<meta charset=\"utf-8\">\n<title>Impact Report: {}</title>\n",
        escape_html(&policy.title)
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<h1>Impact Report: {}</h1>\n",
        escape_html(&policy.title)
    ));
    html.push_str(&format!(
        "<p>Policy #{} &middot; status: {}</p>\n",
        policy.id,
        escape_html(&policy.status)
    ));

    html.push_str("<h2>Risk</h2>\n<ul>\n");
    html.push_str(&format!(
        "<li>Overall score: {} / 100</li>\n",
        risk.overall_risk_score
    ));
    html.push_str(&format!("<li>Level: {}</li>\n", risk.risk_level));
    html.push_str(&format!(
        "<li>Requires approval: {}</li>\n",
        if risk.requires_approval { "yes" } else { "no" }
    ));
    html.push_str("</ul>\n");

    if !risk.risk_factors.is_empty() {
        html.push_str("<h2>Risk factors</h2>\n<ul>\n");
        for factor in &risk.risk_factors {
            html.push_str(&format!("<li>{}</li>\n", escape_html(&factor.factor)));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h2>Change scope</h2>\n<ul>\n");
    html.push_str(&format!(
        "<li>System-wide: {}</li>\n",
        if scope.is_system_wide { "yes" } else { "no" }
    ));
    html.push_str(&format!("<li>Impact radius: {}</li>\n", scope.impact_radius));
    html.push_str(&format!(
        "<li>Affected departments: {}</li>\n",
        if scope.affected_departments.is_empty() {
            "none".to_string()
        } else {
            escape_html(&scope.affected_departments.join(", "))
        }
    ));
    html.push_str("</ul>\n");

    if !analysis.recommendations.mitigation_strategies.is_empty() {
        html.push_str("<h2>Mitigation strategies</h2>\n<ul>\n");
        for strategy in &analysis.recommendations.mitigation_strategies {
            html.push_str(&format!("<li>{}</li>\n", escape_html(strategy)));
        }
        html.push_str("</ul>\n");
    }

    if !analysis.pre_publish_checklist.is_empty() {
        html.push_str("<h2>Pre-publish checklist</h2>\n<ul>\n");
        for item in &analysis.pre_publish_checklist {
            html.push_str(&format!(
                "<li>{}{}</li>\n",
                escape_html(&item.item),
                if item.required { " (required)" } else { "" }
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Minimal HTML entity escaping for text content and attribute values.
fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
