//! Deterministic trust scoring under the fixed posture rubric.
//!
//! Pure: no clock, no randomness, no I/O, no mutation of the evidence.
//! Identical records always produce the identical score and breakdown, so
//! a score can be re-derived from its audit trail at any later time.

use crate::types::{Criterion, CriterionScore, EvidenceRecord, TrustResult};

/// The rubric: every criterion with its weight, in evaluation and display
/// order. Weights are part of the trust contract, not configuration.
pub const RUBRIC: [(Criterion, u8); 5] = [
    (Criterion::FirewallActive, 25),
    (Criterion::AntivirusActive, 25),
    (Criterion::OsCurrent, 20),
    (Criterion::NoRiskyPorts, 20),
    (Criterion::ScanFreshness, 10),
];

/// Highest attainable score; the rubric weights sum to this.
pub const MAX_SCORE: u8 = 100;

/// Score an evidence record under the rubric.
///
/// Additive and all-or-nothing per criterion: each one contributes its
/// full weight or zero, independently of the others. The breakdown lists
/// every criterion in rubric order with the points actually awarded.
#[must_use]
pub fn score(evidence: &EvidenceRecord) -> TrustResult {
    let mut total = 0u8;
    let mut breakdown = Vec::with_capacity(RUBRIC.len());

    for (criterion, weight) in RUBRIC {
        let points = if criterion_met(criterion, evidence) {
            weight
        } else {
            0
        };
        total += points;
        breakdown.push(CriterionScore { criterion, points });
    }

    TrustResult {
        score: total,
        breakdown,
        evidence: evidence.clone(),
    }
}

/// Whether the evidence satisfies one criterion.
const fn criterion_met(criterion: Criterion, evidence: &EvidenceRecord) -> bool {
    match criterion {
        Criterion::FirewallActive => evidence.firewall_enabled,
        Criterion::AntivirusActive => evidence.antivirus_running,
        Criterion::OsCurrent => evidence.os_updated,
        Criterion::NoRiskyPorts => !evidence.risky_ports_found,
        Criterion::ScanFreshness => evidence.recent_scan,
    }
}
