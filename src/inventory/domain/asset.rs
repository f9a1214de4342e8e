use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::Result;

/// Maximum length for asset names
const MAX_ASSET_NAME_LENGTH: usize = 200;

/// Maximum length for asset IDs
const MAX_ASSET_ID_LENGTH: usize = 64;

/// NewType wrapper for asset IDs with shape validation.
///
/// IDs are unique within a BOM and immutable once assigned. The accepted
/// shape is an identifier-safe pattern: a leading alphanumeric character
/// followed by alphanumerics, hyphens, or underscores. Lowercase is
/// accepted, but canonical uppercase is recommended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: String) -> Result<Self> {
        if id.is_empty() {
            anyhow::bail!("Asset ID cannot be empty");
        }

        if id.len() > MAX_ASSET_ID_LENGTH {
            anyhow::bail!(
                "Asset ID is too long ({} bytes). Maximum allowed: {} bytes",
                id.len(),
                MAX_ASSET_ID_LENGTH
            );
        }

        let mut chars = id.chars();
        let first = chars.next().unwrap_or('_');
        if !first.is_ascii_alphanumeric() {
            anyhow::bail!("Asset ID must start with a letter or digit");
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            anyhow::bail!(
                "Asset ID contains invalid characters. Only letters, digits, hyphens, and underscores are allowed."
            );
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of cryptographic asset being recorded.
///
/// The system records metadata about these assets; it performs no
/// cryptographic operations itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CryptoKind {
    Algorithm,
    Key,
    Certificate,
    Library,
    CipherSuite,
}

impl fmt::Display for CryptoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CryptoKind::Algorithm => "algorithm",
            CryptoKind::Key => "key",
            CryptoKind::Certificate => "certificate",
            CryptoKind::Library => "library",
            CryptoKind::CipherSuite => "cipher_suite",
        };
        write!(f, "{}", label)
    }
}

/// Purpose of a cryptographic asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Encryption,
    Hashing,
    Signing,
    KeyExchange,
    Authentication,
}

/// Recorded lifecycle status of a cryptographic asset.
///
/// This is the *stored* status; validators derive an effective status that
/// may override it (e.g., a past expiration date forces `Expired`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Deprecated,
    Vulnerable,
    Expired,
    Planned,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Active => "active",
            Status::Deprecated => "deprecated",
            Status::Vulnerable => "vulnerable",
            Status::Expired => "expired",
            Status::Planned => "planned",
        };
        write!(f, "{}", label)
    }
}

/// Derived severity classification for an asset.
///
/// Never stored - always recomputed from status, algorithm, and score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        write!(f, "{}", label)
    }
}

/// Quantitative fields for a hardware/component asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDetail {
    pub category: String,
    pub quantity: u32,
    pub unit_cost: f64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub part_number: String,
}

/// Security fields for a cryptographic asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoDetail {
    pub kind: CryptoKind,
    pub algorithm: String,
    #[serde(default)]
    pub key_length: Option<u32>,
    #[serde(default)]
    pub cipher_mode: String,
    #[serde(default)]
    pub purpose: Option<Purpose>,
    pub status: Status,
    #[serde(default)]
    pub library: String,
    #[serde(default)]
    pub vulnerability_score: f64,
    #[serde(default)]
    pub known_cves: BTreeSet<String>,
    #[serde(default)]
    pub rotation_schedule: String,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub dependencies: BTreeSet<AssetId>,
}

impl CryptoDetail {
    /// Creates a crypto detail with the given kind and algorithm,
    /// everything else defaulted (active, no score, no CVEs).
    pub fn new(kind: CryptoKind, algorithm: impl Into<String>) -> Self {
        Self {
            kind,
            algorithm: algorithm.into(),
            key_length: None,
            cipher_mode: String::new(),
            purpose: None,
            status: Status::Active,
            library: String::new(),
            vulnerability_score: 0.0,
            known_cves: BTreeSet::new(),
            rotation_schedule: String::new(),
            expiration_date: None,
            dependencies: BTreeSet::new(),
        }
    }
}

/// Variant payload of an asset.
///
/// The tag is serialized as `asset_type` alongside the flattened variant
/// fields, so exported documents stay flat per-asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "asset_type", rename_all = "snake_case")]
pub enum AssetDetail {
    Component(ComponentDetail),
    Crypto(CryptoDetail),
}

impl AssetDetail {
    pub fn type_label(&self) -> &str {
        match self {
            AssetDetail::Component(_) => "component",
            AssetDetail::Crypto(_) => "crypto",
        }
    }
}

/// One inventory item tracked by a BOM.
///
/// Assets are constructed by the presentation layer with a full field set
/// and are never mutated in place afterwards; the owning BOM's update
/// operation replaces fields and records the change in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub compliance: BTreeSet<String>,
    #[serde(flatten)]
    pub detail: AssetDetail,
}

impl Asset {
    pub fn new(id: AssetId, name: impl Into<String>, detail: AssetDetail) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            compliance: BTreeSet::new(),
            detail,
        }
    }

    /// Convenience constructor for a component asset.
    pub fn component(id: &str, name: &str, detail: ComponentDetail) -> Result<Self> {
        Ok(Self::new(
            AssetId::new(id.to_string())?,
            name,
            AssetDetail::Component(detail),
        ))
    }

    /// Convenience constructor for a cryptographic asset.
    pub fn crypto(id: &str, name: &str, detail: CryptoDetail) -> Result<Self> {
        Ok(Self::new(
            AssetId::new(id.to_string())?,
            name,
            AssetDetail::Crypto(detail),
        ))
    }

    /// Derived total cost: `quantity × unit_cost` for components,
    /// 0 for cryptographic assets (which carry no quantity or cost).
    pub fn total_cost(&self) -> f64 {
        match &self.detail {
            AssetDetail::Component(c) => f64::from(c.quantity) * c.unit_cost,
            AssetDetail::Crypto(_) => 0.0,
        }
    }

    /// Whether the asset's expiration date lies at or before `today`.
    ///
    /// A component asset never expires. This is a derived value; the stored
    /// status is not mutated.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match &self.detail {
            AssetDetail::Crypto(c) => c.expiration_date.is_some_and(|d| d <= today),
            AssetDetail::Component(_) => false,
        }
    }

    /// Whether the asset declares membership in the given compliance standard.
    pub fn is_compliant(&self, standard: &str) -> bool {
        self.compliance.contains(standard)
    }

    /// Whether the asset has any recorded vulnerability signal
    /// (a non-zero CVSS-like score or at least one known CVE).
    pub fn has_vulnerability_signal(&self) -> bool {
        match &self.detail {
            AssetDetail::Crypto(c) => c.vulnerability_score > 0.0 || !c.known_cves.is_empty(),
            AssetDetail::Component(_) => false,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentDetail> {
        match &self.detail {
            AssetDetail::Component(c) => Some(c),
            AssetDetail::Crypto(_) => None,
        }
    }

    pub fn as_crypto(&self) -> Option<&CryptoDetail> {
        match &self.detail {
            AssetDetail::Crypto(c) => Some(c),
            AssetDetail::Component(_) => None,
        }
    }

    /// Flattened field-name → JSON-value view of this asset.
    ///
    /// The same representation backs audit entries and snapshot diffs, so
    /// field-level changes are comparable across both.
    pub fn field_map(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        let value = serde_json::to_value(self)?;
        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            _ => anyhow::bail!("Asset did not serialize to a JSON object"),
        }
    }
}

/// Validates the descriptive name of an asset. Used by the asset validator
/// and kept here next to the length limit it enforces.
pub fn validate_asset_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Asset name cannot be empty");
    }
    if name.chars().count() > MAX_ASSET_NAME_LENGTH {
        anyhow::bail!(
            "Asset name is too long ({} characters). Maximum allowed: {} characters",
            name.chars().count(),
            MAX_ASSET_NAME_LENGTH
        );
    }
    Ok(())
}
