//! Core data types for the evaluation pipeline.

pub mod evidence;
pub mod trust;

pub use evidence::{
    contains_risky_port, EvidenceFragment, EvidenceRecord, ProbeProvenance, ProbeSource,
    Provenance, RISKY_PORTS,
};
pub use trust::{Criterion, CriterionScore, TrustResult};
