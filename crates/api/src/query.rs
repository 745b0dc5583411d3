//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Query parameters for graph-bounded endpoints (`?max_depth=N`).
///
/// Depth is optional; the engine substitutes its documented default and
/// clamps to the supported ceiling. A non-numeric or negative value is
/// rejected at extraction time with a 400.
#[derive(Debug, Deserialize)]
pub struct GraphParams {
    pub max_depth: Option<u32>,
}

/// Query parameters for the impact report endpoint (`?format=json|html|pdf`).
///
/// Omitted format defaults to `json`; unknown values are a 400.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub format: Option<String>,
}
