use chrono::NaiveDate;

use crate::inventory::domain::asset::validate_asset_name;
use crate::inventory::domain::{Asset, AssetDetail, CryptoDetail, CryptoKind, Purpose, RiskLevel, Status};
use crate::inventory::policies::{PolicySet, WeakSeverity};

/// Result of validating a single asset or a whole BOM.
///
/// Validators never fail fast: they collect the complete error list so a
/// caller can present every finding at once. `ok` is simply
/// `errors.is_empty()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

/// Why an asset was classified HIGH or CRITICAL. Drives the fixed
/// recommendation templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskReason {
    Expired,
    Vulnerable,
    Deprecated,
    WeakAlgorithm,
    HighCvss,
}

/// Algorithm name substrings treated as symmetric families for the
/// key-length minimum check.
const SYMMETRIC_FAMILIES: &[&str] = &["aes", "chacha", "des", "rc4", "rc2", "camellia", "blowfish"];

/// Stateless rule engine validating one asset's fields and deriving its
/// risk classification.
///
/// Purely functional: derived overrides (effective status, risk level) are
/// read-only values and are never written back to the asset.
pub struct AssetValidator;

impl AssetValidator {
    /// Validates an asset against the shape rules and the weak-algorithm
    /// policy, returning every distinct failure.
    ///
    /// Enum-typed fields (status, purpose, kind) are closed by construction
    /// and are not re-checked at runtime.
    pub fn validate(asset: &Asset, policy: &PolicySet, today: NaiveDate) -> ValidationReport {
        let mut errors = Vec::new();

        if let Err(e) = validate_asset_name(&asset.name) {
            errors.push(e.to_string());
        }

        match &asset.detail {
            AssetDetail::Component(component) => {
                if !component.unit_cost.is_finite() || component.unit_cost < 0.0 {
                    errors.push("Unit cost must be a non-negative number".to_string());
                }
            }
            AssetDetail::Crypto(crypto) => {
                Self::validate_crypto(crypto, policy, asset.is_expired(today), &mut errors);
            }
        }

        ValidationReport::from_errors(errors)
    }

    fn validate_crypto(
        crypto: &CryptoDetail,
        policy: &PolicySet,
        expired: bool,
        errors: &mut Vec<String>,
    ) {
        if crypto.algorithm.is_empty() {
            errors.push("Algorithm must be specified".to_string());
        }

        if !crypto.vulnerability_score.is_finite()
            || crypto.vulnerability_score < 0.0
            || crypto.vulnerability_score > 10.0
        {
            errors.push(format!(
                "Vulnerability score {} is outside the valid range 0-10",
                crypto.vulnerability_score
            ));
        }

        let needs_key_length =
            crypto.kind == CryptoKind::Key || crypto.purpose == Some(Purpose::KeyExchange);
        match crypto.key_length {
            None if needs_key_length => {
                errors.push("Key length must be specified for cryptographic keys".to_string());
            }
            Some(bits) => {
                let algorithm = crypto.algorithm.to_lowercase();
                if algorithm.contains("rsa") && bits < 2048 {
                    errors.push(format!(
                        "RSA key length {} is below the 2048-bit minimum and is considered weak",
                        bits
                    ));
                } else if SYMMETRIC_FAMILIES.iter().any(|f| algorithm.contains(f)) && bits < 128 {
                    errors.push(format!(
                        "Symmetric key length {} is below the 128-bit minimum and is considered weak",
                        bits
                    ));
                }
            }
            None => {}
        }

        if expired {
            errors.push("Asset has passed its expiration date".to_string());
        }

        if let Some(severity) = policy.weak_algorithms.classify(&crypto.algorithm) {
            errors.push(format!(
                "Algorithm '{}' is a known-weak algorithm (forced minimum status: {})",
                crypto.algorithm, severity
            ));
        }
    }

    /// Derived status after applying the expiry and weak-algorithm
    /// overrides. `None` for component assets, which have no status.
    ///
    /// The stored status is never mutated; callers wanting to persist the
    /// override must apply it explicitly.
    pub fn effective_status(asset: &Asset, policy: &PolicySet, today: NaiveDate) -> Option<Status> {
        let crypto = asset.as_crypto()?;

        if asset.is_expired(today) || crypto.status == Status::Expired {
            return Some(Status::Expired);
        }
        if crypto.status == Status::Vulnerable {
            return Some(Status::Vulnerable);
        }

        match policy.weak_algorithms.classify(&crypto.algorithm) {
            Some(WeakSeverity::Vulnerable) => Some(Status::Vulnerable),
            Some(WeakSeverity::Deprecated) if crypto.status != Status::Deprecated => {
                Some(Status::Deprecated)
            }
            _ => Some(crypto.status),
        }
    }

    /// Derived risk classification, evaluated strictly in order - the first
    /// matching rule wins:
    ///
    /// 1. CRITICAL if effectively vulnerable or expired.
    /// 2. HIGH if effectively deprecated, the algorithm is in the weak
    ///    table, or the vulnerability score is ≥ 7.0.
    /// 3. MEDIUM if the score is in [4.0, 7.0).
    /// 4. LOW otherwise.
    ///
    /// Component assets carry no security surface and are always LOW.
    pub fn risk_level(asset: &Asset, policy: &PolicySet, today: NaiveDate) -> RiskLevel {
        let Some(crypto) = asset.as_crypto() else {
            return RiskLevel::Low;
        };

        match Self::effective_status(asset, policy, today) {
            Some(Status::Vulnerable) | Some(Status::Expired) => return RiskLevel::Critical,
            Some(Status::Deprecated) => return RiskLevel::High,
            _ => {}
        }

        if policy.weak_algorithms.classify(&crypto.algorithm).is_some()
            || crypto.vulnerability_score >= 7.0
        {
            RiskLevel::High
        } else if crypto.vulnerability_score >= 4.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Primary reason an asset is HIGH or CRITICAL, in fixed precedence:
    /// expired, vulnerable, deprecated, weak algorithm, high CVSS.
    /// `None` for assets below HIGH.
    pub fn risk_reason(asset: &Asset, policy: &PolicySet, today: NaiveDate) -> Option<RiskReason> {
        if Self::risk_level(asset, policy, today) < RiskLevel::High {
            return None;
        }
        let crypto = asset.as_crypto()?;

        if asset.is_expired(today) || crypto.status == Status::Expired {
            return Some(RiskReason::Expired);
        }
        if crypto.status == Status::Vulnerable {
            return Some(RiskReason::Vulnerable);
        }
        if crypto.status == Status::Deprecated {
            return Some(RiskReason::Deprecated);
        }
        if policy.weak_algorithms.classify(&crypto.algorithm).is_some() {
            return Some(RiskReason::WeakAlgorithm);
        }
        Some(RiskReason::HighCvss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::domain::{Asset, ComponentDetail};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    fn crypto_asset(algorithm: &str) -> Asset {
        Asset::crypto(
            "A1",
            "Test asset",
            CryptoDetail::new(CryptoKind::Algorithm, algorithm),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_asset_passes() {
        let policy = PolicySet::default();
        let report = AssetValidator::validate(&crypto_asset("AES-256-GCM"), &policy, today());
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_algorithm_rejected() {
        let policy = PolicySet::default();
        let report = AssetValidator::validate(&crypto_asset(""), &policy, today());
        assert!(!report.ok);
        assert!(report.errors.iter().any(|e| e.contains("Algorithm must be specified")));
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let policy = PolicySet::default();
        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "AES-256");
        detail.vulnerability_score = 11.0;
        let asset = Asset::crypto("A1", "Test", detail).unwrap();

        let report = AssetValidator::validate(&asset, &policy, today());
        assert!(report.errors.iter().any(|e| e.contains("outside the valid range")));
    }

    #[test]
    fn test_key_without_length_rejected() {
        let policy = PolicySet::default();
        let detail = CryptoDetail::new(CryptoKind::Key, "RSA-2048");
        let asset = Asset::crypto("K1", "Key", detail).unwrap();

        let report = AssetValidator::validate(&asset, &policy, today());
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("Key length must be specified")));
    }

    #[test]
    fn test_short_rsa_key_flagged_weak() {
        let policy = PolicySet::default();
        let mut detail = CryptoDetail::new(CryptoKind::Key, "RSA-1024");
        detail.key_length = Some(1024);
        let asset = Asset::crypto("K1", "Key", detail).unwrap();

        let report = AssetValidator::validate(&asset, &policy, today());
        assert!(report.errors.iter().any(|e| e.contains("below the 2048-bit minimum")));
    }

    #[test]
    fn test_short_symmetric_key_flagged_weak() {
        let policy = PolicySet::default();
        let mut detail = CryptoDetail::new(CryptoKind::Key, "AES-64");
        detail.key_length = Some(64);
        let asset = Asset::crypto("K1", "Key", detail).unwrap();

        let report = AssetValidator::validate(&asset, &policy, today());
        assert!(report.errors.iter().any(|e| e.contains("below the 128-bit minimum")));
    }

    #[test]
    fn test_component_with_negative_cost_rejected() {
        let policy = PolicySet::default();
        let asset = Asset::component(
            "R1",
            "Resistor",
            ComponentDetail {
                category: "Resistors".to_string(),
                quantity: 1,
                unit_cost: -0.5,
                supplier: String::new(),
                part_number: String::new(),
            },
        )
        .unwrap();

        let report = AssetValidator::validate(&asset, &policy, today());
        assert!(report.errors.iter().any(|e| e.contains("non-negative")));
    }

    #[test]
    fn test_weak_algorithm_reported() {
        let policy = PolicySet::default();
        let report = AssetValidator::validate(&crypto_asset("MD5"), &policy, today());
        assert!(report.errors.iter().any(|e| e.contains("known-weak algorithm")));
    }

    #[test]
    fn test_sha1_active_is_at_least_high() {
        // A weak algorithm must dominate the stored status
        let policy = PolicySet::default();
        let asset = crypto_asset("SHA-1");
        assert_eq!(asset.as_crypto().unwrap().status, Status::Active);

        let risk = AssetValidator::risk_level(&asset, &policy, today());
        assert!(risk >= RiskLevel::High);
    }

    #[test]
    fn test_md5_is_critical() {
        let policy = PolicySet::default();
        let risk = AssetValidator::risk_level(&crypto_asset("MD5"), &policy, today());
        assert_eq!(risk, RiskLevel::Critical);
    }

    #[test]
    fn test_expired_asset_is_critical() {
        let policy = PolicySet::default();
        let mut detail = CryptoDetail::new(CryptoKind::Certificate, "RSA-4096");
        detail.expiration_date = NaiveDate::from_ymd_opt(2025, 1, 1);
        let asset = Asset::crypto("CERT-1", "Cert", detail).unwrap();

        assert_eq!(
            AssetValidator::effective_status(&asset, &policy, today()),
            Some(Status::Expired)
        );
        assert_eq!(
            AssetValidator::risk_level(&asset, &policy, today()),
            RiskLevel::Critical
        );
    }

    #[test]
    fn test_cvss_bands() {
        let policy = PolicySet::default();

        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "AES-256");
        detail.vulnerability_score = 7.0;
        let high = Asset::crypto("A1", "a", detail.clone()).unwrap();
        assert_eq!(
            AssetValidator::risk_level(&high, &policy, today()),
            RiskLevel::High
        );

        detail.vulnerability_score = 5.0;
        let medium = Asset::crypto("A2", "a", detail.clone()).unwrap();
        assert_eq!(
            AssetValidator::risk_level(&medium, &policy, today()),
            RiskLevel::Medium
        );

        detail.vulnerability_score = 3.9;
        let low = Asset::crypto("A3", "a", detail).unwrap();
        assert_eq!(
            AssetValidator::risk_level(&low, &policy, today()),
            RiskLevel::Low
        );
    }

    #[test]
    fn test_component_is_always_low() {
        let policy = PolicySet::default();
        let asset = Asset::component(
            "R1",
            "Resistor",
            ComponentDetail {
                category: "Resistors".to_string(),
                quantity: 1,
                unit_cost: 0.1,
                supplier: String::new(),
                part_number: String::new(),
            },
        )
        .unwrap();
        assert_eq!(
            AssetValidator::risk_level(&asset, &policy, today()),
            RiskLevel::Low
        );
        assert!(AssetValidator::effective_status(&asset, &policy, today()).is_none());
    }

    #[test]
    fn test_risk_reason_precedence() {
        let policy = PolicySet::default();

        // Expired dominates everything else
        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "MD5");
        detail.status = Status::Vulnerable;
        detail.expiration_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        let expired = Asset::crypto("A1", "a", detail).unwrap();
        assert_eq!(
            AssetValidator::risk_reason(&expired, &policy, today()),
            Some(RiskReason::Expired)
        );

        // Weak algorithm beats high CVSS
        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "SHA-1");
        detail.vulnerability_score = 9.0;
        let weak = Asset::crypto("A2", "a", detail).unwrap();
        assert_eq!(
            AssetValidator::risk_reason(&weak, &policy, today()),
            Some(RiskReason::WeakAlgorithm)
        );

        // High CVSS alone
        let mut detail = CryptoDetail::new(CryptoKind::Algorithm, "AES-256");
        detail.vulnerability_score = 8.0;
        let cvss = Asset::crypto("A3", "a", detail).unwrap();
        assert_eq!(
            AssetValidator::risk_reason(&cvss, &policy, today()),
            Some(RiskReason::HighCvss)
        );

        // LOW assets have no reason
        let fine = crypto_asset("AES-256-GCM");
        assert_eq!(AssetValidator::risk_reason(&fine, &policy, today()), None);
    }
}
