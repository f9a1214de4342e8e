/// Read-only analyses over domain types: per-asset validation and risk
/// classification, and BOM-level validation, completeness, posture,
/// recommendations, and compliance reporting.
pub mod asset_validator;
pub mod bom_validator;

pub use asset_validator::{AssetValidator, RiskReason, ValidationReport};
pub use bom_validator::{
    BomValidator, ComplianceReport, CompletenessReport, FieldCompleteness, PostureReport,
};
