//! Pure domain logic for the CareOps policy administration backend.
//!
//! This crate holds the policy dependency model and the impact analysis
//! engine. It knows nothing about persistence or HTTP; storage is reached
//! through the [`impact::store::DependencyStore`] capability trait and the
//! API layer lives in `careops-api`.

pub mod dependency;
pub mod error;
pub mod impact;
pub mod types;
