use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A slice of a contract's work. Region scope comes from the parent contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subdivision {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
