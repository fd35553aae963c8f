//! # stance-engine
//!
//! Device posture evaluation: probe a host's security state with external
//! inspection tools, aggregate the findings, and score them under a fixed
//! rubric.
//!
//! The external tools (osquery for OS and security state, nmap for open
//! ports) are treated as unreliable informants. Each probe adapter
//! tolerates a missing binary, a failed run, or garbled output, and always
//! hands back a usable evidence fragment tagged with the code path it took.
//! The pipeline as a whole therefore never fails; degraded hosts surface
//! as lower scores and non-live provenance tags.
//!
//! ## Data Flow
//!
//! ```text
//! Evaluator::evaluate()
//!   -> SystemStateProbe::probe()  \  concurrent, each bounded by
//!   -> OpenPortsProbe::probe()    /  a per-tool timeout
//!   -> aggregate(fragments)          -> EvidenceRecord
//!   -> scoring::score(&record)       -> TrustResult
//! ```
//!
//! Scoring is pure and deterministic: the same evidence record always
//! yields the same score, so results can be re-derived from their audit
//! trail.

pub mod aggregate;
pub mod error;
pub mod evaluate;
pub mod probes;
pub mod scoring;
pub mod types;

pub use error::ProbeError;
pub use evaluate::Evaluator;
pub use probes::{OpenPortsProbe, SystemStateProbe};
pub use types::*;
