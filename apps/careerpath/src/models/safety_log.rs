use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Table the audit trail is appended to.
pub const SAFETY_LOGS_TABLE: &str = "safety_logs";

/// One append-only audit record for a moderation action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyLogEntry {
    pub action: String,
    pub item_id: String,
    pub table_name: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
    pub admin_id: Option<Uuid>,
}
