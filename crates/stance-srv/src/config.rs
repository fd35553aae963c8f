//! Server configuration for the posture evaluation boundary.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use stance_engine::probes::{DEFAULT_NMAP_PROGRAM, DEFAULT_OSQUERY_PROGRAM};

/// Configuration for a stance posture evaluation node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address (default: 0.0.0.0:5000).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// External inspection tool programs.
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Program names (or paths) for the inspection tools. Only the programs
/// are configurable; their arguments and timeouts are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// osquery shell (default: osqueryi).
    #[serde(default = "default_osquery")]
    pub osquery: String,

    /// Port scanner (default: nmap).
    #[serde(default = "default_nmap")]
    pub nmap: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            osquery: default_osquery(),
            nmap: default_nmap(),
        }
    }
}

impl ServerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::SrvError::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }
}

// Default value functions for serde.
fn default_listen() -> SocketAddr {
    "0.0.0.0:5000".parse().expect("valid default addr")
}

fn default_osquery() -> String {
    String::from(DEFAULT_OSQUERY_PROGRAM)
}

fn default_nmap() -> String {
    String::from(DEFAULT_NMAP_PROGRAM)
}
