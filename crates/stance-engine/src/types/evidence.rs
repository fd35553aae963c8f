//! Evidence types: probe fragments and the canonical posture record.

use serde::{Deserialize, Serialize};

/// TCP ports treated as inherently high-risk when found open.
///
/// 21 = FTP, 23 = Telnet, 445 = SMB, 3389 = RDP. Fixed set; extending it
/// is a rubric change, not configuration.
pub const RISKY_PORTS: [u16; 4] = [21, 23, 445, 3389];

/// True if any of `ports` falls in [`RISKY_PORTS`].
///
/// The only place the risky flag is derived. Adapters and the aggregator
/// both go through here, so the flag can never disagree with the port list
/// it was computed from.
#[must_use]
pub fn contains_risky_port(ports: &[u16]) -> bool {
    ports.iter().any(|port| RISKY_PORTS.contains(port))
}

/// Which code path produced a probe's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// The external tool ran successfully and its output was parsed.
    Live,
    /// The tool binary is absent; documented fallback values were used.
    Fallback,
    /// The tool is present but failed; zero-value defaults were used.
    Error,
}

/// Identifies the probe adapter a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeSource {
    /// OS identity and security state (osquery).
    SystemState,
    /// Open TCP ports on the local host (nmap).
    OpenPorts,
}

/// Partial signal set produced by one probe adapter.
///
/// Each evidence field is owned by exactly one adapter; a fragment carries
/// `None` for every field outside its owner's remit. Merging fragments is
/// therefore a union of disjoint sets, never last-writer-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFragment {
    /// Adapter that produced this fragment.
    pub source: ProbeSource,
    /// Code path the values came from.
    pub provenance: Provenance,
    /// Human-readable OS name and version.
    pub os_label: Option<String>,
    /// Whether the OS is considered up to date.
    pub os_updated: Option<bool>,
    /// Whether a host firewall is active.
    pub firewall_enabled: Option<bool>,
    /// Whether antivirus/endpoint protection is running.
    pub antivirus_running: Option<bool>,
    /// Open TCP ports in discovery order.
    pub open_ports: Option<Vec<u16>>,
    /// Whether any open port is in the risky set.
    pub risky_ports_found: Option<bool>,
}

impl EvidenceFragment {
    /// A fragment with no fields set, ready for the owner to fill in.
    #[must_use]
    pub const fn empty(source: ProbeSource, provenance: Provenance) -> Self {
        Self {
            source,
            provenance,
            os_label: None,
            os_updated: None,
            firewall_enabled: None,
            antivirus_running: None,
            open_ports: None,
            risky_ports_found: None,
        }
    }
}

/// Canonical posture snapshot of one host at evaluation time.
///
/// Fully populated after aggregation: missing real data shows up as a
/// documented default plus a non-[`Provenance::Live`] tag, never as an
/// absent field. Scoring reads this record and must not mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Human-readable OS name and version; `"unknown"` when nothing better.
    pub os_label: String,
    /// Whether the OS is considered up to date.
    pub os_updated: bool,
    /// Whether a host firewall is active.
    pub firewall_enabled: bool,
    /// Whether antivirus/endpoint protection is running.
    pub antivirus_running: bool,
    /// Open TCP ports in discovery order, kept for diagnostics.
    pub open_ports: Vec<u16>,
    /// Derived from `open_ports`; never set independently of it.
    pub risky_ports_found: bool,
    /// True for every record built from a live evaluation cycle. Hook for
    /// cached or replayed evidence, which would not qualify.
    pub recent_scan: bool,
    /// Code-path tag per adapter. Diagnostic only; not scored.
    pub provenance: ProbeProvenance,
}

/// Per-adapter provenance tags for a full record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeProvenance {
    /// Code path of the OS/security-state contribution.
    pub system_state: Provenance,
    /// Code path of the open-ports contribution.
    pub open_ports: Provenance,
}

impl Default for ProbeProvenance {
    /// A source that contributed nothing is indistinguishable from one
    /// that failed, so the default tag is `Error`.
    fn default() -> Self {
        Self {
            system_state: Provenance::Error,
            open_ports: Provenance::Error,
        }
    }
}
