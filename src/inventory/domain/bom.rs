use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::{Asset, AssetDetail, CryptoKind};
use super::audit::{AuditEntry, FieldMap};
use crate::shared::{BomError, Result};

/// Descriptive header of a BOM document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomMetadata {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Unique serial assigned at export time (`urn:uuid:...`); not part of
    /// the round-trip contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

/// Serialized form of a BOM: metadata, ordered assets, and audit history.
///
/// This is the persisted format for both file export and version snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomDocument {
    pub metadata: BomMetadata,
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub audit_log: Vec<AuditEntry>,
}

/// Aggregate statistics over a BOM at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomSummary {
    pub project_name: String,
    pub total_assets: usize,
    pub type_counts: BTreeMap<String, usize>,
    pub vulnerable_assets: usize,
    pub expired_assets: usize,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// Bill of Materials: an ordered collection of assets plus an append-only
/// audit log.
///
/// Insertion order is preserved for display and for the ordering contracts
/// of snapshot diffs. Lookups are linear scans; collections are expected to
/// be sized in the hundreds to low thousands.
#[derive(Debug, Clone, PartialEq)]
pub struct Bom {
    project_name: String,
    description: String,
    created_at: DateTime<Utc>,
    assets: Vec<Asset>,
    audit_log: Vec<AuditEntry>,
}

impl Bom {
    pub fn new(project_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            description: description.into(),
            created_at: Utc::now(),
            assets: Vec::new(),
            audit_log: Vec::new(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Assets in insertion order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.position(id).map(|i| &self.assets[i])
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.assets.iter().position(|a| a.id.as_str() == id)
    }

    /// Adds an asset and records an `added` audit entry.
    ///
    /// # Errors
    /// Returns `BomError::DuplicateId` if an asset with the same ID is
    /// already present; the BOM is left unchanged in that case.
    pub fn add(&mut self, asset: Asset, user: &str) -> Result<()> {
        if self.contains(asset.id.as_str()) {
            return Err(BomError::DuplicateId {
                id: asset.id.to_string(),
            }
            .into());
        }

        let entry = AuditEntry::added(asset.id.as_str(), &asset.name, asset.field_map()?, user);
        self.assets.push(asset);
        self.audit_log.push(entry);
        Ok(())
    }

    /// Removes an asset by ID and records a `removed` audit entry carrying
    /// the removed asset's full field snapshot.
    ///
    /// Dependents referencing the removed ID are left dangling; the BOM
    /// validator flags them.
    ///
    /// # Errors
    /// Returns `BomError::NotFound` if no asset with the ID exists.
    pub fn remove(&mut self, id: &str, user: &str) -> Result<Asset> {
        let index = self.position(id).ok_or_else(|| BomError::NotFound {
            id: id.to_string(),
        })?;

        let asset = self.assets.remove(index);
        self.audit_log.push(AuditEntry::removed(
            asset.id.as_str(),
            &asset.name,
            asset.field_map()?,
            user,
        ));
        Ok(asset)
    }

    /// Replaces an asset's fields with the proposed values, recording an
    /// `updated` audit entry limited to the fields that actually changed.
    ///
    /// Returns `true` if at least one field changed. A proposal identical to
    /// the current state is a no-op and appends no audit entry.
    ///
    /// # Errors
    /// - `BomError::NotFound` if no asset with the ID exists.
    /// - `BomError::Validation` if the proposed asset carries a different ID
    ///   (IDs are immutable once assigned).
    ///
    /// A failed update leaves the asset unchanged.
    pub fn update(&mut self, id: &str, proposed: Asset, user: &str) -> Result<bool> {
        let index = self.position(id).ok_or_else(|| BomError::NotFound {
            id: id.to_string(),
        })?;

        if proposed.id.as_str() != id {
            return Err(BomError::Validation {
                message: format!(
                    "Asset IDs are immutable: cannot change '{}' to '{}'",
                    id, proposed.id
                ),
            }
            .into());
        }

        let current_fields = self.assets[index].field_map()?;
        let proposed_fields = proposed.field_map()?;
        let (old_changed, new_changed) = changed_fields(&current_fields, &proposed_fields);

        if old_changed.is_empty() {
            return Ok(false);
        }

        let entry = AuditEntry::updated(id, &proposed.name, old_changed, new_changed, user);
        self.assets[index] = proposed;
        self.audit_log.push(entry);
        Ok(true)
    }

    /// Sum of `quantity × unit_cost` over all assets.
    pub fn total_cost(&self) -> f64 {
        self.assets.iter().map(Asset::total_cost).sum()
    }

    /// Component assets in the given category.
    pub fn assets_in_category(&self, category: &str) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|a| a.as_component().is_some_and(|c| c.category == category))
            .collect()
    }

    /// Cryptographic assets of the given kind.
    pub fn assets_of_kind(&self, kind: CryptoKind) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|a| a.as_crypto().is_some_and(|c| c.kind == kind))
            .collect()
    }

    /// Assets with any recorded vulnerability signal.
    pub fn vulnerable_assets(&self) -> Vec<&Asset> {
        self.assets
            .iter()
            .filter(|a| a.has_vulnerability_signal())
            .collect()
    }

    /// Assets whose expiration date lies at or before `today`.
    pub fn expired_assets(&self, today: NaiveDate) -> Vec<&Asset> {
        self.assets.iter().filter(|a| a.is_expired(today)).collect()
    }

    /// Aggregate statistics (counts by type, vulnerability and expiry
    /// counts, total cost).
    pub fn summary(&self, today: NaiveDate) -> BomSummary {
        let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
        for asset in &self.assets {
            let label = match &asset.detail {
                AssetDetail::Component(c) => c.category.clone(),
                AssetDetail::Crypto(c) => c.kind.to_string(),
            };
            *type_counts.entry(label).or_insert(0) += 1;
        }

        BomSummary {
            project_name: self.project_name.clone(),
            total_assets: self.assets.len(),
            type_counts,
            vulnerable_assets: self.vulnerable_assets().len(),
            expired_assets: self.expired_assets(today).len(),
            total_cost: self.total_cost(),
            created_at: self.created_at,
        }
    }

    /// Serializes the full in-memory state into a document, assigning a
    /// fresh export serial number.
    pub fn to_document(&self) -> BomDocument {
        BomDocument {
            metadata: BomMetadata {
                project_name: self.project_name.clone(),
                description: self.description.clone(),
                created_at: self.created_at,
                serial_number: Some(format!("urn:uuid:{}", Uuid::new_v4())),
            },
            assets: self.assets.clone(),
            audit_log: self.audit_log.clone(),
        }
    }

    /// Rebuilds a BOM from a document, replacing the entire state.
    ///
    /// The persisted audit log is carried over as-is; the import itself is
    /// not an audited mutation.
    ///
    /// # Errors
    /// Returns `BomError::Validation` if the document contains duplicate
    /// asset IDs.
    pub fn from_document(document: BomDocument) -> Result<Self> {
        let mut seen: Vec<&str> = Vec::with_capacity(document.assets.len());
        for asset in &document.assets {
            if seen.contains(&asset.id.as_str()) {
                return Err(BomError::Validation {
                    message: format!("Document contains duplicate asset ID '{}'", asset.id),
                }
                .into());
            }
            seen.push(asset.id.as_str());
        }

        Ok(Self {
            project_name: document.metadata.project_name,
            description: document.metadata.description,
            created_at: document.metadata.created_at,
            assets: document.assets,
            audit_log: document.audit_log,
        })
    }

    /// Builds a BOM from an already-deduplicated asset list with a fresh
    /// audit log. Used by assembly flattening, which resolves ID collisions
    /// before reaching this point.
    pub(crate) fn from_flattened(
        project_name: impl Into<String>,
        description: impl Into<String>,
        assets: Vec<Asset>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            description: description.into(),
            created_at: Utc::now(),
            assets,
            audit_log: Vec::new(),
        }
    }
}

/// Field-level difference between two flattened asset representations.
///
/// Returns matching (old, new) maps limited to fields whose values differ;
/// a field present on only one side appears with `null` on the other.
pub fn changed_fields(old: &FieldMap, new: &FieldMap) -> (FieldMap, FieldMap) {
    let mut old_changed = FieldMap::new();
    let mut new_changed = FieldMap::new();

    for (key, old_value) in old {
        let new_value = new.get(key).cloned().unwrap_or(serde_json::Value::Null);
        if *old_value != new_value {
            old_changed.insert(key.clone(), old_value.clone());
            new_changed.insert(key.clone(), new_value);
        }
    }
    for (key, new_value) in new {
        if !old.contains_key(key) {
            old_changed.insert(key.clone(), serde_json::Value::Null);
            new_changed.insert(key.clone(), new_value.clone());
        }
    }

    (old_changed, new_changed)
}
