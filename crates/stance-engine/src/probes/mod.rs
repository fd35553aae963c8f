//! Probe adapters wrapping the external inspection tools.
//!
//! Each adapter owns a disjoint set of evidence fields and is total: it
//! always hands back a usable fragment, degrading to documented fallback
//! values when its tool is absent and to zero values when the tool fails.
//! Adapter errors therefore never propagate out of this module.

pub mod exec;
pub mod open_ports;
pub mod system_state;

pub use exec::ToolCommand;
pub use open_ports::{OpenPortsProbe, DEFAULT_NMAP_PROGRAM};
pub use system_state::{SystemStateProbe, DEFAULT_OSQUERY_PROGRAM};
