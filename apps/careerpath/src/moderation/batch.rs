//! Sequential batch deletion with per-item outcomes.
//!
//! Items are processed strictly one after another so the audit trail is
//! written in input order. One failure never stops the batch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::moderation::audit::ActionLogger;
use crate::store::{Filter, Store};

const BATCH_DELETE_DETAILS: &str = "Deleted in batch operation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTarget {
    pub id: String,
    pub table_name: String,
}

impl DeleteTarget {
    pub fn new(table_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            table_name: table_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub item: DeleteTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct BatchDeleter {
    store: Arc<dyn Store>,
    logger: ActionLogger,
}

impl BatchDeleter {
    pub fn new(store: Arc<dyn Store>, logger: ActionLogger) -> Self {
        Self { store, logger }
    }

    /// Deletes each target by id, returning one outcome per input in order.
    pub async fn batch_delete(&self, items: &[DeleteTarget]) -> Vec<DeleteOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());

        for item in items {
            let filter = Filter::eq("id", item.id.as_str());
            match self.store.delete(&item.table_name, &filter).await {
                Ok(()) => {
                    self.logger
                        .log_action("DELETE", &item.id, &item.table_name, BATCH_DELETE_DETAILS)
                        .await;
                    outcomes.push(DeleteOutcome {
                        success: true,
                        item: item.clone(),
                        error: None,
                    });
                }
                Err(e) => {
                    warn!("Failed to delete {}/{}: {e}", item.table_name, item.id);
                    outcomes.push(DeleteOutcome {
                        success: false,
                        item: item.clone(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let failed = outcomes.iter().filter(|o| !o.success).count();
        info!(
            "Batch delete finished: {} succeeded, {failed} failed",
            outcomes.len() - failed
        );
        outcomes
    }
}
