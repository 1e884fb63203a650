//! Per-item outcome summaries for bulk operations.

use serde::Serialize;
use storefront_core::types::DbId;

/// A single item that a bulk operation could not apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub id: DbId,
    pub error: String,
}

/// Outcome of a bulk operation. Individual failures never abort the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkResult {
    pub succeeded: Vec<DbId>,
    pub failed: Vec<BulkFailure>,
}

impl BulkResult {
    pub fn ok(&mut self, id: DbId) {
        self.succeeded.push(id);
    }

    pub fn fail(&mut self, id: DbId, error: impl ToString) {
        self.failed.push(BulkFailure {
            id,
            error: error.to_string(),
        });
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
