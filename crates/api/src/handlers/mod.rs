//! Request handlers.
//!
//! Each submodule provides async handler functions for one area of the API.
//! Handlers delegate to the impact analysis engine in `careops_core` and map
//! errors via [`crate::error::AppError`].

pub mod dependencies;
pub mod impact;
