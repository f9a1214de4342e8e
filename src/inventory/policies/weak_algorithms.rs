use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Minimum status a weak-algorithm match forces onto an asset.
///
/// `Deprecated` lifts the effective risk to at least HIGH; `Vulnerable`
/// lifts it to CRITICAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakSeverity {
    Deprecated,
    Vulnerable,
}

impl fmt::Display for WeakSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeakSeverity::Deprecated => write!(f, "deprecated"),
            WeakSeverity::Vulnerable => write!(f, "vulnerable"),
        }
    }
}

impl FromStr for WeakSeverity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deprecated" => Ok(WeakSeverity::Deprecated),
            "vulnerable" => Ok(WeakSeverity::Vulnerable),
            _ => Err(format!(
                "Invalid severity: {}. Please specify 'deprecated' or 'vulnerable'",
                s
            )),
        }
    }
}

/// One weak-algorithm rule: a case-insensitive substring pattern and the
/// severity it forces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeakAlgorithmRule {
    pub pattern: String,
    pub severity: WeakSeverity,
}

/// Ordered table of known-weak algorithm rules.
///
/// Classification is a pure function of the algorithm name: the first rule
/// whose pattern appears as a case-insensitive substring wins, so more
/// specific patterns (`3des`) must come before generic ones (`des`).
#[derive(Debug, Clone, PartialEq)]
pub struct WeakAlgorithmTable {
    rules: Vec<WeakAlgorithmRule>,
}

impl WeakAlgorithmTable {
    pub fn new(rules: Vec<WeakAlgorithmRule>) -> Self {
        Self { rules }
    }

    /// Built-in table covering the classic broken or aging primitives.
    pub fn builtin() -> Self {
        let rule = |pattern: &str, severity: WeakSeverity| WeakAlgorithmRule {
            pattern: pattern.to_string(),
            severity,
        };
        Self::new(vec![
            rule("md5", WeakSeverity::Vulnerable),
            rule("rc4", WeakSeverity::Vulnerable),
            rule("rc2", WeakSeverity::Vulnerable),
            rule("sslv2", WeakSeverity::Vulnerable),
            rule("sslv3", WeakSeverity::Vulnerable),
            // 3DES before DES: first match wins
            rule("3des", WeakSeverity::Deprecated),
            rule("des", WeakSeverity::Vulnerable),
            rule("sha-1", WeakSeverity::Deprecated),
            rule("sha1", WeakSeverity::Deprecated),
            rule("tls 1.0", WeakSeverity::Deprecated),
            rule("tls 1.1", WeakSeverity::Deprecated),
        ])
    }

    pub fn rules(&self) -> &[WeakAlgorithmRule] {
        &self.rules
    }

    /// Returns the forced severity for a known-weak algorithm name, or
    /// `None` if the name matches no rule.
    pub fn classify(&self, algorithm: &str) -> Option<WeakSeverity> {
        let lowered = algorithm.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lowered.contains(&rule.pattern.to_lowercase()))
            .map(|rule| rule.severity)
    }
}

impl Default for WeakAlgorithmTable {
    fn default() -> Self {
        Self::builtin()
    }
}
