/// Externalized policy tables.
///
/// The weak-algorithm table and penalty weights are configuration data, kept
/// apart from the scoring algorithm so the policy can be audited and tested
/// independently and overridden from a policy file.
pub mod scoring;
pub mod weak_algorithms;

pub use scoring::{PenaltyWeights, PolicySet, Posture};
pub use weak_algorithms::{WeakAlgorithmRule, WeakAlgorithmTable, WeakSeverity};
