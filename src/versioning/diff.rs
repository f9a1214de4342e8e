use serde::Serialize;
use serde_json::Value;

use crate::inventory::domain::bom::changed_fields;
use crate::inventory::domain::{Asset, BomDocument};
use crate::shared::Result;

/// One field whose value differs between two versions of an asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: String,
    pub old: Value,
    pub new: Value,
}

/// An asset present in both versions with at least one changed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifiedAsset {
    pub id: String,
    pub changes: Vec<FieldChange>,
}

/// Asymmetric difference between two snapshots, A → B.
///
/// `added` and `modified` follow B's insertion order; `removed` follows
/// A's. Diffing a version against itself yields an empty diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionDiff {
    pub from_version: String,
    pub to_version: String,
    pub added: Vec<Asset>,
    pub removed: Vec<Asset>,
    pub modified: Vec<ModifiedAsset>,
    /// `B.total_cost − A.total_cost`.
    pub cost_change: f64,
}

impl VersionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Computes the asset-level and field-level differences between two BOM
/// documents.
///
/// # Errors
/// Returns an error if an asset cannot be flattened for field comparison.
pub fn diff_documents(
    from_version: &str,
    to_version: &str,
    a: &BomDocument,
    b: &BomDocument,
) -> Result<VersionDiff> {
    let mut added = Vec::new();
    let mut modified = Vec::new();

    for asset in &b.assets {
        match a.assets.iter().find(|x| x.id == asset.id) {
            None => added.push(asset.clone()),
            Some(previous) => {
                let (old_changed, new_changed) =
                    changed_fields(&previous.field_map()?, &asset.field_map()?);
                if old_changed.is_empty() {
                    continue;
                }
                let changes = old_changed
                    .into_iter()
                    .zip(new_changed.into_values())
                    .map(|((field, old), new)| FieldChange { field, old, new })
                    .collect();
                modified.push(ModifiedAsset {
                    id: asset.id.to_string(),
                    changes,
                });
            }
        }
    }

    let removed = a
        .assets
        .iter()
        .filter(|asset| !b.assets.iter().any(|x| x.id == asset.id))
        .cloned()
        .collect();

    let cost_total = |doc: &BomDocument| doc.assets.iter().map(Asset::total_cost).sum::<f64>();

    Ok(VersionDiff {
        from_version: from_version.to_string(),
        to_version: to_version.to_string(),
        added,
        removed,
        modified,
        cost_change: cost_total(b) - cost_total(a),
    })
}
