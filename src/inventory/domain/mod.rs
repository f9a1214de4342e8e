/// Pure domain types for the asset inventory.
pub mod asset;
pub mod audit;
pub mod bom;
pub mod hierarchy;

pub use asset::{
    Asset, AssetDetail, AssetId, ComponentDetail, CryptoDetail, CryptoKind, Purpose, RiskLevel,
    Status,
};
pub use audit::{AuditAction, AuditEntry, FieldMap};
pub use bom::{Bom, BomDocument, BomMetadata, BomSummary};
pub use hierarchy::{Assembly, AssemblySummary};
