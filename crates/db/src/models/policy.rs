//! Policy document rows.

use careops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `policies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Policy {
    pub id: DbId,
    pub title: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
