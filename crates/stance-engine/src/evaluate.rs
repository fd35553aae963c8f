//! Evaluation orchestrator: one probe-aggregate-score cycle per call.

use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::probes::{OpenPortsProbe, SystemStateProbe};
use crate::scoring;
use crate::types::TrustResult;

/// Stateless posture evaluator.
///
/// Holds nothing but the two probe configurations, fixed at construction.
/// Every [`evaluate`](Self::evaluate) call gathers fresh evidence; there
/// is no cache, no lock, and no cross-call state, so one instance can be
/// shared across any number of concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    system_state: SystemStateProbe,
    open_ports: OpenPortsProbe,
}

impl Evaluator {
    /// Evaluator using the default `osqueryi` and `nmap` invocations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluator with explicit probe adapters.
    #[must_use]
    pub const fn with_probes(system_state: SystemStateProbe, open_ports: OpenPortsProbe) -> Self {
        Self {
            system_state,
            open_ports,
        }
    }

    /// Run one full evaluation: probe, aggregate, score.
    ///
    /// Infallible. Every adapter is total, aggregation cannot fail, and
    /// scoring is pure; degraded hosts produce lower scores and non-live
    /// provenance tags, not errors. The two probes run concurrently, each
    /// bounded by its own tool timeout.
    pub async fn evaluate(&self) -> TrustResult {
        debug!("starting posture evaluation");

        let (system_fragment, ports_fragment) =
            tokio::join!(self.system_state.probe(), self.open_ports.probe());

        debug!(
            system = ?system_fragment.provenance,
            ports = ?ports_fragment.provenance,
            "probes finished"
        );

        let evidence = aggregate(&[system_fragment, ports_fragment]);
        let result = scoring::score(&evidence);

        info!(
            score = result.score,
            os = %result.evidence.os_label,
            "posture evaluation complete"
        );
        result
    }
}
