//! Best-effort audit trail of moderation actions.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::safety_log::{SafetyLogEntry, SAFETY_LOGS_TABLE};
use crate::store::{Row, Store};

/// Appends [`SafetyLogEntry`] records to `safety_logs`.
///
/// The audit table is optional: deployments without it simply get no trail.
/// Logging never fails the operation it accompanies.
#[derive(Clone)]
pub struct ActionLogger {
    store: Arc<dyn Store>,
    admin_id: Option<Uuid>,
}

impl ActionLogger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            admin_id: None,
        }
    }

    /// Stamps every entry with the acting admin.
    pub fn with_admin(mut self, admin_id: Uuid) -> Self {
        self.admin_id = Some(admin_id);
        self
    }

    pub fn entry(&self, action: &str, item_id: &str, table: &str, details: &str) -> SafetyLogEntry {
        SafetyLogEntry {
            action: action.to_string(),
            item_id: item_id.to_string(),
            table_name: table.to_string(),
            details: details.to_string(),
            timestamp: Utc::now(),
            admin_id: self.admin_id,
        }
    }

    pub async fn try_log(
        &self,
        action: &str,
        item_id: &str,
        table: &str,
        details: &str,
    ) -> Result<(), StoreError> {
        let entry = self.entry(action, item_id, table, details);
        let row: Row = match serde_json::to_value(&entry) {
            Ok(serde_json::Value::Object(map)) => map,
            Ok(other) => {
                return Err(StoreError::Decode(format!(
                    "log entry serialised to non-object {other}"
                )))
            }
            Err(e) => return Err(StoreError::Decode(e.to_string())),
        };
        self.store.insert(SAFETY_LOGS_TABLE, row).await
    }

    /// Records an action, swallowing every failure. A missing `safety_logs`
    /// table is expected and stays quiet; anything else is reported.
    pub async fn log_action(&self, action: &str, item_id: &str, table: &str, details: &str) {
        match self.try_log(action, item_id, table, details).await {
            Ok(()) => debug!("Logged {action} on {table}/{item_id}"),
            Err(e) if e.is_missing_relation() => {
                debug!("{SAFETY_LOGS_TABLE} table not present, skipping audit entry")
            }
            Err(e) => error!("Failed to write audit entry for {action} on {table}/{item_id}: {e}"),
        }
    }
}
