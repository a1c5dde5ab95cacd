use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity levels for activity events. Downstream sinks use them for
/// retention and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Authorization-relevant mutations: long-term retention.
    Critical,
    /// Regular domain changes (default).
    Important,
    /// High-volume noise, aggressively trimmed.
    Noise,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Important => "important",
            Severity::Noise => "noise",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Important
    }
}

/// Trait for entities that appear in the activity stream. Implement it on a
/// model to enable declarative logging of its mutations.
pub trait Loggable: Serialize + Send + Sync {
    /// The entity type name, the prefix in event names like "task.transitioned".
    fn entity_type() -> &'static str;

    /// The subject id, usually the entity's primary key.
    fn subject_id(&self) -> Uuid;

    /// Severity level for events about this entity (defaults to Important).
    fn severity(&self) -> Severity {
        Severity::Important
    }

    /// Override severity based on action. Revocations and deletions always
    /// matter for audit, whatever the entity's default.
    fn severity_for_action(&self, action: &str) -> Severity {
        match action {
            "deleted" | "revoked" => Severity::Critical,
            _ => self.severity(),
        }
    }
}
