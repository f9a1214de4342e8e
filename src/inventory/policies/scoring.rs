use std::fmt;

use serde::{Deserialize, Serialize};

use super::weak_algorithms::WeakAlgorithmTable;
use crate::inventory::domain::RiskLevel;

/// Per-risk-level penalty weights for the composite security score.
///
/// These are a fixed policy table, not derived values; the defaults can be
/// overridden through the policy config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            critical: 25.0,
            high: 10.0,
            medium: 3.0,
            low: 0.0,
        }
    }
}

impl PenaltyWeights {
    pub fn penalty(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::Critical => self.critical,
            RiskLevel::High => self.high,
            RiskLevel::Medium => self.medium,
            RiskLevel::Low => self.low,
        }
    }
}

/// Step-function label over the composite security score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Posture {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Posture {
    /// EXCELLENT ≥ 90, GOOD ≥ 70, FAIR ≥ 50, else POOR.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Posture::Excellent
        } else if score >= 70.0 {
            Posture::Good
        } else if score >= 50.0 {
            Posture::Fair
        } else {
            Posture::Poor
        }
    }
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Posture::Excellent => "EXCELLENT",
            Posture::Good => "GOOD",
            Posture::Fair => "FAIR",
            Posture::Poor => "POOR",
        };
        write!(f, "{}", label)
    }
}

/// The complete policy surface consumed by the validators: the
/// weak-algorithm table and the scoring weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicySet {
    pub weak_algorithms: WeakAlgorithmTable,
    pub penalties: PenaltyWeights,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = PenaltyWeights::default();
        assert_eq!(weights.penalty(RiskLevel::Critical), 25.0);
        assert_eq!(weights.penalty(RiskLevel::High), 10.0);
        assert_eq!(weights.penalty(RiskLevel::Medium), 3.0);
        assert_eq!(weights.penalty(RiskLevel::Low), 0.0);
    }

    #[test]
    fn test_posture_thresholds() {
        assert_eq!(Posture::from_score(100.0), Posture::Excellent);
        assert_eq!(Posture::from_score(90.0), Posture::Excellent);
        assert_eq!(Posture::from_score(89.9), Posture::Good);
        assert_eq!(Posture::from_score(70.0), Posture::Good);
        assert_eq!(Posture::from_score(50.0), Posture::Fair);
        assert_eq!(Posture::from_score(49.9), Posture::Poor);
        assert_eq!(Posture::from_score(0.0), Posture::Poor);
    }

    #[test]
    fn test_posture_display() {
        assert_eq!(format!("{}", Posture::Excellent), "EXCELLENT");
        assert_eq!(format!("{}", Posture::Poor), "POOR");
    }
}
