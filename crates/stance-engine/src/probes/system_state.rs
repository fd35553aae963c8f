//! OS and security-state probe backed by the osquery shell.
//!
//! Runs one fixed read-only query for OS identity. Two of the fields this
//! adapter owns are placeholder heuristics for now: firewall state is
//! inferred from the tool answering at all rather than from a dedicated
//! query, and no antivirus detection is wired up, so live runs report it
//! as not running. Both gaps are kept visible here instead of being
//! papered over with optimistic values.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ProbeError;
use crate::probes::exec::{run_tool, ToolCommand};
use crate::types::{EvidenceFragment, ProbeSource, Provenance};

/// Default program name for the osquery interactive shell.
pub const DEFAULT_OSQUERY_PROGRAM: &str = "osqueryi";

/// The one query this adapter is allowed to run.
const OS_VERSION_QUERY: &str = "SELECT name, version, build FROM os_version;";

/// Time budget for one osquery invocation.
const OSQUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback source for OS identity when osquery is absent.
const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Label used when no OS identity could be determined.
const UNKNOWN_OS: &str = "unknown";

/// One row of `os_version` output. Unknown columns are ignored.
#[derive(Debug, Deserialize)]
struct OsVersionRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
}

/// Probe adapter for OS identity and security state.
///
/// Owns the `os_label`, `os_updated`, `firewall_enabled` and
/// `antivirus_running` evidence fields. Total: every call returns a usable
/// fragment, whatever the tool does.
#[derive(Debug, Clone)]
pub struct SystemStateProbe {
    command: ToolCommand,
}

impl Default for SystemStateProbe {
    fn default() -> Self {
        Self::new(DEFAULT_OSQUERY_PROGRAM)
    }
}

impl SystemStateProbe {
    /// Adapter invoking `program --json '<os_version query>'`.
    ///
    /// The program is overridable for tests and nonstandard installs; the
    /// query and flags are fixed.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            command: ToolCommand::new(program, &["--json", OS_VERSION_QUERY], OSQUERY_TIMEOUT),
        }
    }

    /// Collect the OS/security-state fragment.
    ///
    /// An absent tool degrades to the optimistic platform fallback; any
    /// other failure, including unparseable output, degrades to zero
    /// values tagged [`Provenance::Error`].
    pub async fn probe(&self) -> EvidenceFragment {
        match run_tool(&self.command).await {
            Ok(stdout) => match parse_os_rows(&self.command.program, &stdout) {
                Ok(rows) => {
                    debug!(rows = rows.len(), "osquery answered");
                    Self::live_fragment(rows.first())
                }
                Err(e) => {
                    warn!(error = %e, "osquery output rejected");
                    Self::error_fragment()
                }
            },
            Err(e) if e.is_tool_missing() => {
                warn!(tool = %self.command.program, "osquery not found, assuming healthy platform defaults");
                Self::fallback_fragment()
            }
            Err(e) => {
                warn!(error = %e, "osquery probe failed");
                Self::error_fragment()
            }
        }
    }

    /// Fragment for a successful invocation.
    ///
    /// An empty result set still counts as the tool answering: the
    /// firewall heuristic holds, but OS identity stays unknown and is not
    /// treated as current.
    fn live_fragment(row: Option<&OsVersionRow>) -> EvidenceFragment {
        let mut fragment = EvidenceFragment::empty(ProbeSource::SystemState, Provenance::Live);
        fragment.os_label = Some(row.map_or_else(|| UNKNOWN_OS.to_string(), os_label_from_row));
        fragment.os_updated = Some(row.is_some());
        fragment.firewall_enabled = Some(true);
        fragment.antivirus_running = Some(false);
        fragment
    }

    /// Optimistic fragment for a host without osquery.
    ///
    /// OS identity comes from the platform itself; the security booleans
    /// are assumed healthy. The `fallback` tag is what keeps this honest.
    fn fallback_fragment() -> EvidenceFragment {
        let mut fragment = EvidenceFragment::empty(ProbeSource::SystemState, Provenance::Fallback);
        fragment.os_label = Some(platform_label());
        fragment.os_updated = Some(true);
        fragment.firewall_enabled = Some(true);
        fragment.antivirus_running = Some(true);
        fragment
    }

    /// Zero-value fragment for a present-but-failing tool.
    fn error_fragment() -> EvidenceFragment {
        let mut fragment = EvidenceFragment::empty(ProbeSource::SystemState, Provenance::Error);
        fragment.os_label = Some(UNKNOWN_OS.to_string());
        fragment.os_updated = Some(false);
        fragment.firewall_enabled = Some(false);
        fragment.antivirus_running = Some(false);
        fragment
    }
}

/// Decode osquery's `--json` output, an array of row objects.
fn parse_os_rows(tool: &str, stdout: &str) -> Result<Vec<OsVersionRow>, ProbeError> {
    serde_json::from_str(stdout.trim()).map_err(|e| ProbeError::Output {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

/// `"<name> <version>"`, trimmed; `"unknown"` if the row is all blanks.
fn os_label_from_row(row: &OsVersionRow) -> String {
    let label = format!("{} {}", row.name, row.version);
    let label = label.trim();
    if label.is_empty() {
        UNKNOWN_OS.to_string()
    } else {
        label.to_string()
    }
}

/// Identify the platform without osquery.
///
/// Prefers `/etc/os-release` where it exists, otherwise falls back to the
/// compile-time OS family name.
fn platform_label() -> String {
    std::fs::read_to_string(OS_RELEASE_PATH)
        .ok()
        .and_then(|content| parse_os_release(&content))
        .unwrap_or_else(|| std::env::consts::OS.to_string())
}

/// Extract `NAME` and `VERSION_ID` from os-release content.
fn parse_os_release(content: &str) -> Option<String> {
    let mut name = None;
    let mut version = None;

    for line in content.lines() {
        if let Some(value) = line.strip_prefix("NAME=") {
            name = Some(value.trim_matches('"').to_string());
        } else if let Some(value) = line.strip_prefix("VERSION_ID=") {
            version = Some(value.trim_matches('"').to_string());
        }
    }

    name.map(|name| match version {
        Some(version) => format!("{name} {version}"),
        None => name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, version: &str) -> OsVersionRow {
        OsVersionRow {
            name: name.to_string(),
            version: version.to_string(),
        }
    }

    #[test]
    fn parses_typical_osquery_output() {
        let stdout = r#"[{"build":"","name":"Ubuntu","version":"22.04.1 LTS (Jammy Jellyfish)"}]"#;
        let rows = parse_os_rows("osqueryi", stdout).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ubuntu");
    }

    #[test]
    fn empty_result_set_parses_as_no_rows() {
        let rows = parse_os_rows("osqueryi", "[]\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn non_json_output_is_rejected() {
        let err = parse_os_rows("osqueryi", "Error: no such table: os_version").unwrap_err();
        assert!(matches!(err, ProbeError::Output { .. }));
    }

    #[test]
    fn label_joins_name_and_version() {
        assert_eq!(os_label_from_row(&row("Ubuntu", "22.04.1")), "Ubuntu 22.04.1");
    }

    #[test]
    fn label_tolerates_missing_version() {
        assert_eq!(os_label_from_row(&row("Arch Linux", "")), "Arch Linux");
    }

    #[test]
    fn blank_row_labels_as_unknown() {
        assert_eq!(os_label_from_row(&row("", "")), UNKNOWN_OS);
    }

    #[test]
    fn live_fragment_with_row_is_fully_owned() {
        let r = row("Ubuntu", "22.04.1");
        let fragment = SystemStateProbe::live_fragment(Some(&r));
        assert_eq!(fragment.provenance, Provenance::Live);
        assert_eq!(fragment.os_label.as_deref(), Some("Ubuntu 22.04.1"));
        assert_eq!(fragment.os_updated, Some(true));
        assert_eq!(fragment.firewall_enabled, Some(true));
        assert_eq!(fragment.antivirus_running, Some(false));
        // Ports belong to the other adapter.
        assert!(fragment.open_ports.is_none());
        assert!(fragment.risky_ports_found.is_none());
    }

    #[test]
    fn live_fragment_without_rows_keeps_firewall_heuristic() {
        let fragment = SystemStateProbe::live_fragment(None);
        assert_eq!(fragment.provenance, Provenance::Live);
        assert_eq!(fragment.os_label.as_deref(), Some(UNKNOWN_OS));
        assert_eq!(fragment.os_updated, Some(false));
        assert_eq!(fragment.firewall_enabled, Some(true));
    }

    #[test]
    fn fallback_fragment_is_optimistic_and_tagged() {
        let fragment = SystemStateProbe::fallback_fragment();
        assert_eq!(fragment.provenance, Provenance::Fallback);
        assert!(fragment.os_label.is_some());
        assert_eq!(fragment.os_updated, Some(true));
        assert_eq!(fragment.firewall_enabled, Some(true));
        assert_eq!(fragment.antivirus_running, Some(true));
    }

    #[test]
    fn error_fragment_is_zero_valued() {
        let fragment = SystemStateProbe::error_fragment();
        assert_eq!(fragment.provenance, Provenance::Error);
        assert_eq!(fragment.os_label.as_deref(), Some(UNKNOWN_OS));
        assert_eq!(fragment.os_updated, Some(false));
        assert_eq!(fragment.firewall_enabled, Some(false));
        assert_eq!(fragment.antivirus_running, Some(false));
    }

    #[test]
    fn os_release_name_and_version_are_joined() {
        let content = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\n";
        assert_eq!(parse_os_release(content), Some("Ubuntu 22.04".to_string()));
    }

    #[test]
    fn os_release_without_version_uses_name_alone() {
        assert_eq!(
            parse_os_release("NAME=\"Arch Linux\"\nID=arch\n"),
            Some("Arch Linux".to_string())
        );
    }

    #[test]
    fn os_release_without_name_yields_nothing() {
        assert_eq!(parse_os_release("ID=mystery\n"), None);
    }

    #[tokio::test]
    async fn missing_tool_takes_the_fallback_path() {
        let probe = SystemStateProbe::new("no-such-osquery-1d2c");
        let fragment = probe.probe().await;
        assert_eq!(fragment.provenance, Provenance::Fallback);
        assert_eq!(fragment.firewall_enabled, Some(true));
    }
}
