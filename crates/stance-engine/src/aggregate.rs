//! Evidence aggregation: merging probe fragments into the canonical record.

use tracing::debug;

use crate::types::{
    contains_risky_port, EvidenceFragment, EvidenceRecord, ProbeProvenance, ProbeSource,
    Provenance,
};

/// Label used when no fragment produced an OS identity.
const UNKNOWN_OS: &str = "unknown";

/// Merge probe fragments into one complete evidence record.
///
/// Field-wise union: each field takes the first fragment value seen for
/// it. Fields are owned by exactly one adapter, so with well-formed input
/// the order of fragments cannot change the outcome; the first-wins rule
/// only matters if a fragment strays outside its remit. Fields no fragment
/// carried resolve to their documented defaults, and a source that
/// contributed no fragment keeps the `Error` provenance tag.
///
/// Total: cannot fail, whatever the fragments contain.
#[must_use]
pub fn aggregate(fragments: &[EvidenceFragment]) -> EvidenceRecord {
    let mut os_label: Option<String> = None;
    let mut os_updated: Option<bool> = None;
    let mut firewall_enabled: Option<bool> = None;
    let mut antivirus_running: Option<bool> = None;
    let mut open_ports: Option<Vec<u16>> = None;
    let mut risky_ports_found: Option<bool> = None;
    let mut system_state: Option<Provenance> = None;
    let mut ports_provenance: Option<Provenance> = None;

    for fragment in fragments {
        match fragment.source {
            ProbeSource::SystemState => merge_field(&mut system_state, &Some(fragment.provenance)),
            ProbeSource::OpenPorts => {
                merge_field(&mut ports_provenance, &Some(fragment.provenance));
            }
        }
        merge_field(&mut os_label, &fragment.os_label);
        merge_field(&mut os_updated, &fragment.os_updated);
        merge_field(&mut firewall_enabled, &fragment.firewall_enabled);
        merge_field(&mut antivirus_running, &fragment.antivirus_running);
        merge_field(&mut open_ports, &fragment.open_ports);
        merge_field(&mut risky_ports_found, &fragment.risky_ports_found);
    }

    let open_ports = open_ports.unwrap_or_default();
    // Re-derive rather than default to false, so a fragment that carried
    // ports without the flag still ends up internally consistent.
    let risky_ports_found =
        risky_ports_found.unwrap_or_else(|| contains_risky_port(&open_ports));

    let record = EvidenceRecord {
        os_label: os_label.unwrap_or_else(|| UNKNOWN_OS.to_string()),
        os_updated: os_updated.unwrap_or(false),
        firewall_enabled: firewall_enabled.unwrap_or(false),
        antivirus_running: antivirus_running.unwrap_or(false),
        open_ports,
        risky_ports_found,
        // Everything merged here was gathered in this evaluation cycle.
        recent_scan: true,
        provenance: ProbeProvenance {
            system_state: system_state.unwrap_or(Provenance::Error),
            open_ports: ports_provenance.unwrap_or(Provenance::Error),
        },
    };

    debug!(
        os = %record.os_label,
        ports = record.open_ports.len(),
        risky = record.risky_ports_found,
        "evidence aggregated"
    );
    record
}

/// First-wins merge of one field slot.
fn merge_field<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_fragment() -> EvidenceFragment {
        let mut fragment = EvidenceFragment::empty(ProbeSource::SystemState, Provenance::Live);
        fragment.os_label = Some("Ubuntu 22.04.1".to_string());
        fragment.os_updated = Some(true);
        fragment.firewall_enabled = Some(true);
        fragment.antivirus_running = Some(false);
        fragment
    }

    fn ports_fragment(ports: Vec<u16>) -> EvidenceFragment {
        let mut fragment = EvidenceFragment::empty(ProbeSource::OpenPorts, Provenance::Live);
        fragment.risky_ports_found = Some(contains_risky_port(&ports));
        fragment.open_ports = Some(ports);
        fragment
    }

    #[test]
    fn both_fragments_fill_the_whole_record() {
        let record = aggregate(&[system_fragment(), ports_fragment(vec![22, 80])]);

        assert_eq!(record.os_label, "Ubuntu 22.04.1");
        assert!(record.os_updated);
        assert!(record.firewall_enabled);
        assert!(!record.antivirus_running);
        assert_eq!(record.open_ports, vec![22, 80]);
        assert!(!record.risky_ports_found);
        assert!(record.recent_scan);
        assert_eq!(record.provenance.system_state, Provenance::Live);
        assert_eq!(record.provenance.open_ports, Provenance::Live);
    }

    #[test]
    fn fragment_order_does_not_matter() {
        let forward = aggregate(&[system_fragment(), ports_fragment(vec![22, 445])]);
        let reverse = aggregate(&[ports_fragment(vec![22, 445]), system_fragment()]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn no_fragments_yields_zero_value_record() {
        let record = aggregate(&[]);

        assert_eq!(record.os_label, "unknown");
        assert!(!record.os_updated);
        assert!(!record.firewall_enabled);
        assert!(!record.antivirus_running);
        assert!(record.open_ports.is_empty());
        assert!(!record.risky_ports_found);
        assert!(record.recent_scan);
        assert_eq!(record.provenance.system_state, Provenance::Error);
        assert_eq!(record.provenance.open_ports, Provenance::Error);
    }

    #[test]
    fn missing_source_is_tagged_error() {
        let record = aggregate(&[system_fragment()]);
        assert_eq!(record.provenance.system_state, Provenance::Live);
        assert_eq!(record.provenance.open_ports, Provenance::Error);
        assert!(record.open_ports.is_empty());
    }

    #[test]
    fn risky_flag_is_derived_when_fragment_omits_it() {
        let mut fragment = EvidenceFragment::empty(ProbeSource::OpenPorts, Provenance::Live);
        fragment.open_ports = Some(vec![445]);

        let record = aggregate(&[fragment]);
        assert!(record.risky_ports_found);
    }

    #[test]
    fn duplicate_source_takes_the_first_fragment() {
        let mut late = EvidenceFragment::empty(ProbeSource::SystemState, Provenance::Error);
        late.os_label = Some("imposter".to_string());

        let record = aggregate(&[system_fragment(), late]);
        assert_eq!(record.os_label, "Ubuntu 22.04.1");
        assert_eq!(record.provenance.system_state, Provenance::Live);
    }

    #[test]
    fn risky_evidence_is_carried_through() {
        let record = aggregate(&[system_fragment(), ports_fragment(vec![21, 8080])]);
        assert!(record.risky_ports_found);
        assert_eq!(record.open_ports, vec![21, 8080]);
    }
}
