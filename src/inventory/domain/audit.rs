use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field-name → JSON-value payload attached to audit entries.
///
/// For additions and removals this is the full field snapshot of the asset;
/// for updates it is limited to the fields that actually changed. That
/// minimality keeps downstream snapshot diffs readable.
pub type FieldMap = BTreeMap<String, serde_json::Value>;

/// Kind of mutation recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Added,
    Removed,
    Updated,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AuditAction::Added => "added",
            AuditAction::Removed => "removed",
            AuditAction::Updated => "updated",
        };
        write!(f, "{}", label)
    }
}

/// One append-only record of a BOM mutation.
///
/// Every mutating BOM operation appends exactly one entry; bulk import does
/// not (loading a document is not an audited mutation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub asset_id: String,
    pub asset_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<FieldMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<FieldMap>,
    pub user: String,
}

impl AuditEntry {
    pub fn added(asset_id: &str, asset_name: &str, new_value: FieldMap, user: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            action: AuditAction::Added,
            asset_id: asset_id.to_string(),
            asset_name: asset_name.to_string(),
            old_value: None,
            new_value: Some(new_value),
            user: user.to_string(),
        }
    }

    pub fn removed(asset_id: &str, asset_name: &str, old_value: FieldMap, user: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            action: AuditAction::Removed,
            asset_id: asset_id.to_string(),
            asset_name: asset_name.to_string(),
            old_value: Some(old_value),
            new_value: None,
            user: user.to_string(),
        }
    }

    pub fn updated(
        asset_id: &str,
        asset_name: &str,
        old_value: FieldMap,
        new_value: FieldMap,
        user: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action: AuditAction::Updated,
            asset_id: asset_id.to_string(),
            asset_name: asset_name.to_string(),
            old_value: Some(old_value),
            new_value: Some(new_value),
            user: user.to_string(),
        }
    }
}
