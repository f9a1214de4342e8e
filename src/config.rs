//! Policy configuration file support for cbom.
//!
//! Provides TOML-based policy overrides through `cbom.policy.toml` files,
//! including data structures, file loading, and validation. Anything not
//! overridden falls back to the built-in policy tables.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::inventory::policies::{
    PenaltyWeights, PolicySet, WeakAlgorithmRule, WeakAlgorithmTable, WeakSeverity,
};
use crate::shared::Result;

const POLICY_FILENAME: &str = "cbom.policy.toml";

/// Top-level policy file schema.
#[derive(Debug, Deserialize, Default)]
pub struct PolicyFile {
    /// Replaces the built-in weak-algorithm table when present.
    pub weak_algorithms: Option<Vec<WeakRuleEntry>>,
    pub penalties: Option<PenaltyEntry>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, toml::Value>,
}

/// One weak-algorithm rule entry as written in the policy file.
#[derive(Debug, Deserialize)]
pub struct WeakRuleEntry {
    pub pattern: String,
    pub severity: String,
}

/// Per-level penalty overrides; omitted levels keep their defaults.
#[derive(Debug, Deserialize, Default)]
pub struct PenaltyEntry {
    pub critical: Option<f64>,
    pub high: Option<f64>,
    pub medium: Option<f64>,
    pub low: Option<f64>,
}

impl PolicyFile {
    /// Merges the file's overrides onto the built-in policy tables.
    pub fn into_policy_set(self) -> Result<PolicySet> {
        let weak_algorithms = match self.weak_algorithms {
            None => WeakAlgorithmTable::builtin(),
            Some(entries) => {
                let rules = entries
                    .into_iter()
                    .map(|entry| {
                        let severity = entry
                            .severity
                            .parse::<WeakSeverity>()
                            .map_err(|e| anyhow::anyhow!(e))?;
                        Ok(WeakAlgorithmRule {
                            pattern: entry.pattern,
                            severity,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                WeakAlgorithmTable::new(rules)
            }
        };

        let mut penalties = PenaltyWeights::default();
        if let Some(entry) = self.penalties {
            if let Some(critical) = entry.critical {
                penalties.critical = critical;
            }
            if let Some(high) = entry.high {
                penalties.high = high;
            }
            if let Some(medium) = entry.medium {
                penalties.medium = medium;
            }
            if let Some(low) = entry.low {
                penalties.low = low;
            }
        }

        Ok(PolicySet {
            weak_algorithms,
            penalties,
        })
    }
}

/// Load a policy file from an explicit path. Returns an error if the file is
/// not found.
pub fn load_policy_from_path(path: &Path) -> Result<PolicyFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read policy file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let policy: PolicyFile = toml::from_str(&content).with_context(|| {
        format!(
            "Failed to parse policy file: {}\n\n💡 Hint: Ensure the file contains valid TOML syntax.",
            path.display()
        )
    })?;

    validate_policy(&policy)?;
    warn_unknown_fields(&policy);

    Ok(policy)
}

/// Auto-discover a policy file in a directory. Returns `None` silently if
/// not found.
pub fn discover_policy(dir: &Path) -> Result<Option<PolicyFile>> {
    let policy_path = dir.join(POLICY_FILENAME);

    if !policy_path.exists() {
        return Ok(None);
    }

    let policy = load_policy_from_path(&policy_path)?;
    Ok(Some(policy))
}

/// Validate the loaded policy file.
fn validate_policy(policy: &PolicyFile) -> Result<()> {
    if let Some(ref rules) = policy.weak_algorithms {
        for (i, entry) in rules.iter().enumerate() {
            if entry.pattern.trim().is_empty() {
                bail!(
                    "Invalid policy: weak_algorithms[{}].pattern must not be empty.\n\n\
                     💡 Hint: Each rule needs a non-empty substring pattern (e.g., \"md5\").",
                    i
                );
            }
            if entry.severity.parse::<WeakSeverity>().is_err() {
                bail!(
                    "Invalid policy: weak_algorithms[{}].severity '{}' is not recognized.\n\n\
                     💡 Hint: Use 'deprecated' or 'vulnerable'.",
                    i,
                    entry.severity
                );
            }
        }
    }

    if let Some(ref penalties) = policy.penalties {
        for (label, value) in [
            ("critical", penalties.critical),
            ("high", penalties.high),
            ("medium", penalties.medium),
            ("low", penalties.low),
        ] {
            if let Some(weight) = value {
                if !weight.is_finite() || weight < 0.0 {
                    bail!(
                        "Invalid policy: penalties.{} must be a non-negative number, got {}.",
                        label,
                        weight
                    );
                }
            }
        }
    }

    Ok(())
}

/// Warn about unknown fields in the policy file.
fn warn_unknown_fields(policy: &PolicyFile) {
    for key in policy.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown policy field '{}' will be ignored.",
            key
        );
    }
}
