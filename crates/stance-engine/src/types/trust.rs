//! Trust result types: the score and its per-criterion breakdown.

use serde::{Deserialize, Serialize};

use super::evidence::EvidenceRecord;

/// The five posture criteria, in rubric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    /// A host firewall is active.
    FirewallActive,
    /// Antivirus/endpoint protection is running.
    AntivirusActive,
    /// The OS is considered up to date.
    OsCurrent,
    /// No port from the risky set is open.
    NoRiskyPorts,
    /// The evidence comes from a recent scan.
    ScanFreshness,
}

/// Points one criterion contributed: its full weight or zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionScore {
    /// Which criterion this entry is for.
    pub criterion: Criterion,
    /// Points awarded. Partial credit does not exist.
    pub points: u8,
}

/// Outcome of one posture evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustResult {
    /// Additive trust score in `0..=100`.
    pub score: u8,
    /// One entry per rubric criterion, in rubric order, present whether or
    /// not the criterion fired.
    pub breakdown: Vec<CriterionScore>,
    /// The evidence the score was computed from, kept as the audit trail.
    pub evidence: EvidenceRecord,
}
