use chrono::NaiveDate;
use serde::Serialize;

use super::asset_validator::{AssetValidator, RiskReason, ValidationReport};
use crate::inventory::domain::{Asset, AssetDetail, Bom, RiskLevel};
use crate::inventory::policies::{PolicySet, Posture};

/// Completeness of one soft field across a BOM, as a 0-100 percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCompleteness {
    pub field: String,
    pub percent: f64,
}

/// How thoroughly the optional descriptive fields are populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletenessReport {
    pub fields: Vec<FieldCompleteness>,
    /// Unweighted mean of the per-field percentages, rounded to one decimal.
    pub overall_percent: f64,
}

/// Composite security posture of a BOM.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostureReport {
    pub total_assets: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub vulnerable: usize,
    pub expired: usize,
    /// `100 − Σ penalty(asset)`, clamped to [0, 100].
    pub security_score: f64,
    pub posture: Posture,
}

/// Partition of a BOM's assets by membership in one compliance standard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub standard: String,
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub percentage: f64,
    pub non_compliant_ids: Vec<String>,
}

/// The soft fields measured by the completeness metric. Each maps onto an
/// equivalent slot in both asset variants.
const SOFT_FIELDS: &[&str] = &["description", "supplier", "tracking_reference", "compliance"];

/// Validates a whole BOM and produces its read-only analyses: structural
/// validation, completeness metric, security posture, recommendations, and
/// compliance partitioning.
pub struct BomValidator;

impl BomValidator {
    /// Structural validation: every asset individually valid, no duplicate
    /// IDs (re-checked defensively even though insertion enforces it), at
    /// least one asset present, and every dependency reference resolving to
    /// an ID in the same BOM.
    pub fn validate(bom: &Bom, policy: &PolicySet, today: NaiveDate) -> ValidationReport {
        let mut errors = Vec::new();

        if bom.is_empty() {
            errors.push("BOM contains no assets".to_string());
        }

        let mut seen: Vec<&str> = Vec::with_capacity(bom.len());
        for asset in bom.assets() {
            if seen.contains(&asset.id.as_str()) {
                errors.push(format!("Duplicate asset ID '{}'", asset.id));
            }
            seen.push(asset.id.as_str());

            let report = AssetValidator::validate(asset, policy, today);
            errors.extend(report.errors.into_iter().map(|e| format!("{}: {}", asset.id, e)));

            if let Some(crypto) = asset.as_crypto() {
                for dependency in &crypto.dependencies {
                    if !bom.contains(dependency.as_str()) {
                        errors.push(format!(
                            "{}: dependency '{}' does not resolve to any asset in this BOM",
                            asset.id, dependency
                        ));
                    }
                }
            }
        }

        ValidationReport::from_errors(errors)
    }

    /// Fraction of assets populating each soft field, and their unweighted
    /// mean, as 0-100 percentages rounded to one decimal. An empty BOM
    /// scores 0%.
    pub fn completeness(bom: &Bom) -> CompletenessReport {
        let total = bom.len();
        let mut fields = Vec::with_capacity(SOFT_FIELDS.len());
        let mut sum = 0.0;

        for &field in SOFT_FIELDS {
            let populated = bom
                .assets()
                .iter()
                .filter(|a| Self::soft_field_populated(a, field))
                .count();
            let percent = if total == 0 {
                0.0
            } else {
                round1(populated as f64 / total as f64 * 100.0)
            };
            sum += percent;
            fields.push(FieldCompleteness {
                field: field.to_string(),
                percent,
            });
        }

        CompletenessReport {
            overall_percent: round1(sum / SOFT_FIELDS.len() as f64),
            fields,
        }
    }

    fn soft_field_populated(asset: &Asset, field: &str) -> bool {
        match field {
            "description" => !asset.description.is_empty(),
            "compliance" => !asset.compliance.is_empty(),
            "supplier" => match &asset.detail {
                AssetDetail::Component(c) => !c.supplier.is_empty(),
                AssetDetail::Crypto(c) => !c.library.is_empty(),
            },
            "tracking_reference" => match &asset.detail {
                AssetDetail::Component(c) => !c.part_number.is_empty(),
                AssetDetail::Crypto(c) => !c.rotation_schedule.is_empty(),
            },
            _ => false,
        }
    }

    /// Composite security score and posture label.
    pub fn security_posture(bom: &Bom, policy: &PolicySet, today: NaiveDate) -> PostureReport {
        let mut counts = [0usize; 4];
        let mut penalty_sum = 0.0;

        for asset in bom.assets() {
            let risk = AssetValidator::risk_level(asset, policy, today);
            let index = match risk {
                RiskLevel::Critical => 0,
                RiskLevel::High => 1,
                RiskLevel::Medium => 2,
                RiskLevel::Low => 3,
            };
            counts[index] += 1;
            penalty_sum += policy.penalties.penalty(risk);
        }

        let security_score = (100.0 - penalty_sum).clamp(0.0, 100.0);

        PostureReport {
            total_assets: bom.len(),
            critical: counts[0],
            high: counts[1],
            medium: counts[2],
            low: counts[3],
            vulnerable: bom.vulnerable_assets().len(),
            expired: bom.expired_assets(today).len(),
            security_score,
            posture: Posture::from_score(security_score),
        }
    }

    /// One human-readable recommendation per CRITICAL or HIGH asset, from a
    /// fixed template keyed by the risk reason. Order follows BOM insertion
    /// order, not severity - a deliberate, testable ordering contract.
    pub fn recommendations(bom: &Bom, policy: &PolicySet, today: NaiveDate) -> Vec<String> {
        let mut recommendations = Vec::new();

        for asset in bom.assets() {
            let Some(reason) = AssetValidator::risk_reason(asset, policy, today) else {
                continue;
            };
            let crypto = match asset.as_crypto() {
                Some(c) => c,
                None => continue,
            };

            let message = match reason {
                RiskReason::Expired => {
                    format!("{}: asset has expired - rotate or retire it", asset.id)
                }
                RiskReason::Vulnerable => {
                    let evidence = if crypto.known_cves.is_empty() {
                        format!("CVSS {}", crypto.vulnerability_score)
                    } else {
                        crypto
                            .known_cves
                            .iter()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join("; ")
                    };
                    format!(
                        "{}: asset has known vulnerabilities ({}) - remediate or replace it",
                        asset.id, evidence
                    )
                }
                RiskReason::Deprecated => format!(
                    "{}: status is deprecated - plan a migration before it leaves service",
                    asset.id
                ),
                RiskReason::WeakAlgorithm => format!(
                    "{}: replace weak algorithm '{}' with a stronger alternative such as AES-256-GCM",
                    asset.id, crypto.algorithm
                ),
                RiskReason::HighCvss => format!(
                    "{}: vulnerability score {} is high - prioritize remediation",
                    asset.id, crypto.vulnerability_score
                ),
            };
            recommendations.push(message);
        }

        recommendations
    }

    /// Assets whose derived risk equals `level`, in insertion order.
    pub fn assets_by_risk<'a>(
        bom: &'a Bom,
        policy: &PolicySet,
        today: NaiveDate,
        level: RiskLevel,
    ) -> Vec<&'a Asset> {
        bom.assets()
            .iter()
            .filter(|a| AssetValidator::risk_level(a, policy, today) == level)
            .collect()
    }

    /// Assets classified CRITICAL.
    pub fn critical_assets<'a>(
        bom: &'a Bom,
        policy: &PolicySet,
        today: NaiveDate,
    ) -> Vec<&'a Asset> {
        Self::assets_by_risk(bom, policy, today, RiskLevel::Critical)
    }

    /// Partitions assets into compliant/non-compliant by set membership in
    /// each asset's compliance field.
    pub fn compliance_report(bom: &Bom, standard: &str) -> ComplianceReport {
        let total = bom.len();
        let non_compliant_ids: Vec<String> = bom
            .assets()
            .iter()
            .filter(|a| !a.is_compliant(standard))
            .map(|a| a.id.to_string())
            .collect();
        let compliant = total - non_compliant_ids.len();
        let percentage = if total == 0 {
            0.0
        } else {
            round1(compliant as f64 / total as f64 * 100.0)
        };

        ComplianceReport {
            standard: standard.to_string(),
            total,
            compliant,
            non_compliant: non_compliant_ids.len(),
            percentage,
            non_compliant_ids,
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{AssetId, ComponentDetail, CryptoDetail, CryptoKind, Status};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn bare_component(id: &str) -> Asset {
        Asset::component(
            id,
            "Part",
            ComponentDetail {
                category: "Misc".to_string(),
                quantity: 1,
                unit_cost: 1.0,
                supplier: String::new(),
                part_number: String::new(),
            },
        )
        .unwrap()
    }

    fn full_component(id: &str) -> Asset {
        let mut asset = Asset::component(
            id,
            "Part",
            ComponentDetail {
                category: "Misc".to_string(),
                quantity: 1,
                unit_cost: 1.0,
                supplier: "Acme".to_string(),
                part_number: "P-100".to_string(),
            },
        )
        .unwrap();
        asset.description = "A part".to_string();
        asset.compliance.insert("RoHS".to_string());
        asset
    }

    #[test]
    fn test_empty_bom_invalid() {
        let bom = Bom::new("Empty", "");
        let report = BomValidator::validate(&bom, &PolicySet::default(), today());
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.contains("no assets")));
    }

    #[test]
    fn test_asset_errors_prefixed_with_id() {
        let mut bom = Bom::new("P", "");
        bom.add(
            Asset::crypto("MD5-1", "Legacy", CryptoDetail::new(CryptoKind::Algorithm, "MD5"))
                .unwrap(),
            "alice",
        )
        .unwrap();

        let report = BomValidator::validate(&bom, &PolicySet::default(), today());
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.starts_with("MD5-1: ")));
    }

    #[test]
    fn test_dangling_dependency_is_error() {
        let mut bom = Bom::new("P", "");
        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "AES-256-GCM");
        detail
            .dependencies
            .insert(AssetId::new("MISSING".to_string()).unwrap());
        bom.add(Asset::crypto("AES-1", "AES", detail).unwrap(), "alice")
            .unwrap();

        let report = BomValidator::validate(&bom, &PolicySet::default(), today());
        assert!(!report.ok);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("dependency 'MISSING' does not resolve")));
    }

    #[test]
    fn test_resolved_dependency_passes() {
        let mut bom = Bom::new("P", "");
        bom.add(
            Asset::crypto("AES-1", "AES", CryptoDetail::new(CryptoKind::Algorithm, "AES-256-GCM"))
                .unwrap(),
            "alice",
        )
        .unwrap();
        let mut detail = CryptoDetail::new(CryptoKind::CipherSuite, "TLS 1.3");
        detail
            .dependencies
            .insert(AssetId::new("AES-1".to_string()).unwrap());
        bom.add(Asset::crypto("TLS13", "TLS", detail).unwrap(), "alice")
            .unwrap();

        let report = BomValidator::validate(&bom, &PolicySet::default(), today());
        assert!(report.ok, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_completeness_empty_fields_is_zero() {
        let mut bom = Bom::new("P", "");
        bom.add(bare_component("R1"), "alice").unwrap();
        bom.add(bare_component("R2"), "alice").unwrap();

        let report = BomValidator::completeness(&bom);
        assert_eq!(report.overall_percent, 0.0);
        assert!(report.fields.iter().all(|f| f.percent == 0.0));
    }

    #[test]
    fn test_completeness_full_fields_is_hundred() {
        let mut bom = Bom::new("P", "");
        bom.add(full_component("R1"), "alice").unwrap();

        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "AES-256-GCM");
        detail.library = "OpenSSL 3.0.1".to_string();
        detail.rotation_schedule = "90 days".to_string();
        let mut crypto = Asset::crypto("AES-1", "AES", detail).unwrap();
        crypto.description = "Primary encryption".to_string();
        crypto.compliance.insert("FIPS 140-2".to_string());
        bom.add(crypto, "alice").unwrap();

        let report = BomValidator::completeness(&bom);
        assert_eq!(report.overall_percent, 100.0);
    }

    #[test]
    fn test_completeness_partial() {
        let mut bom = Bom::new("P", "");
        bom.add(full_component("R1"), "alice").unwrap();
        bom.add(bare_component("R2"), "alice").unwrap();

        let report = BomValidator::completeness(&bom);
        assert_eq!(report.overall_percent, 50.0);
        assert!(report.fields.iter().all(|f| f.percent == 50.0));
    }

    #[test]
    fn test_security_posture_penalties() {
        let policy = PolicySet::default();
        let mut bom = Bom::new("P", "");
        // CRITICAL (25) + HIGH (10): score 65 → FAIR
        bom.add(
            Asset::crypto("MD5-1", "md5", CryptoDetail::new(CryptoKind::Algorithm, "MD5")).unwrap(),
            "alice",
        )
        .unwrap();
        bom.add(
            Asset::crypto("SHA1-1", "sha1", CryptoDetail::new(CryptoKind::Algorithm, "SHA-1"))
                .unwrap(),
            "alice",
        )
        .unwrap();

        let report = BomValidator::security_posture(&bom, &policy, today());
        assert_eq!(report.critical, 1);
        assert_eq!(report.high, 1);
        assert_eq!(report.security_score, 65.0);
        assert_eq!(report.posture, Posture::Fair);
    }

    #[test]
    fn test_security_posture_clamped_at_zero() {
        let policy = PolicySet::default();
        let mut bom = Bom::new("P", "");
        for i in 0..5 {
            bom.add(
                Asset::crypto(
                    &format!("MD5-{}", i),
                    "md5",
                    CryptoDetail::new(CryptoKind::Algorithm, "MD5"),
                )
                .unwrap(),
                "alice",
            )
            .unwrap();
        }

        let report = BomValidator::security_posture(&bom, &policy, today());
        assert_eq!(report.security_score, 0.0);
        assert_eq!(report.posture, Posture::Poor);
    }

    #[test]
    fn test_clean_bom_is_excellent() {
        let policy = PolicySet::default();
        let mut bom = Bom::new("P", "");
        bom.add(full_component("R1"), "alice").unwrap();

        let report = BomValidator::security_posture(&bom, &policy, today());
        assert_eq!(report.security_score, 100.0);
        assert_eq!(report.posture, Posture::Excellent);
    }

    #[test]
    fn test_recommendations_follow_insertion_order() {
        let policy = PolicySet::default();
        let mut bom = Bom::new("P", "");

        // HIGH (weak algorithm) inserted before CRITICAL (vulnerable status):
        // insertion order must be preserved, not severity order
        bom.add(
            Asset::crypto("SHA1-1", "sha1", CryptoDetail::new(CryptoKind::Algorithm, "SHA-1"))
                .unwrap(),
            "alice",
        )
        .unwrap();
        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "AES-256");
        detail.status = Status::Vulnerable;
        bom.add(Asset::crypto("VULN-1", "vuln", detail).unwrap(), "alice")
            .unwrap();

        let recommendations = BomValidator::recommendations(&bom, &policy, today());
        assert_eq!(recommendations.len(), 2);
        assert!(recommendations[0].starts_with("SHA1-1:"));
        assert!(recommendations[0].contains("weak algorithm"));
        assert!(recommendations[1].starts_with("VULN-1:"));
        assert!(recommendations[1].contains("known vulnerabilities"));
    }

    #[test]
    fn test_no_recommendations_for_healthy_bom() {
        let policy = PolicySet::default();
        let mut bom = Bom::new("P", "");
        bom.add(full_component("R1"), "alice").unwrap();
        assert!(BomValidator::recommendations(&bom, &policy, today()).is_empty());
    }

    #[test]
    fn test_assets_by_risk_queries() {
        let policy = PolicySet::default();
        let mut bom = Bom::new("P", "");
        bom.add(
            Asset::crypto("MD5-1", "md5", CryptoDetail::new(CryptoKind::Algorithm, "MD5")).unwrap(),
            "alice",
        )
        .unwrap();
        bom.add(
            Asset::crypto("SHA1-1", "sha1", CryptoDetail::new(CryptoKind::Algorithm, "SHA-1"))
                .unwrap(),
            "alice",
        )
        .unwrap();
        bom.add(full_component("R1"), "alice").unwrap();

        let critical = BomValidator::critical_assets(&bom, &policy, today());
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id.as_str(), "MD5-1");

        let high = BomValidator::assets_by_risk(&bom, &policy, today(), RiskLevel::High);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id.as_str(), "SHA1-1");

        let low = BomValidator::assets_by_risk(&bom, &policy, today(), RiskLevel::Low);
        assert_eq!(low.len(), 1);
    }

    #[test]
    fn test_compliance_report() {
        let mut bom = Bom::new("P", "");
        let mut compliant = Asset::crypto(
            "AES-1",
            "AES",
            CryptoDetail::new(CryptoKind::Algorithm, "AES-256-GCM"),
        )
        .unwrap();
        compliant.compliance.insert("FIPS 140-2".to_string());
        bom.add(compliant, "alice").unwrap();
        bom.add(
            Asset::crypto("X-1", "Other", CryptoDetail::new(CryptoKind::Algorithm, "ChaCha20"))
                .unwrap(),
            "alice",
        )
        .unwrap();

        let report = BomValidator::compliance_report(&bom, "FIPS 140-2");
        assert_eq!(report.total, 2);
        assert_eq!(report.compliant, 1);
        assert_eq!(report.non_compliant, 1);
        assert_eq!(report.percentage, 50.0);
        assert_eq!(report.non_compliant_ids, vec!["X-1".to_string()]);
    }
}
