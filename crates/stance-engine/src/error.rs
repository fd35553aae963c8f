//! Error types for external tool invocation.
//!
//! These errors stay inside the probe adapters: an absent tool resolves to
//! the adapter's documented fallback fragment, and every other failure to a
//! zero-value fragment tagged with `Error` provenance. Nothing here ever
//! crosses the evaluation boundary.

use std::time::Duration;

use thiserror::Error;

/// Failure modes of a single external tool invocation.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The tool binary could not be located on this host.
    #[error("tool not found: {tool}")]
    ToolMissing {
        /// Program name as invoked.
        tool: String,
    },

    /// The tool exists but could not be spawned or awaited.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        /// Program name as invoked.
        tool: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran to completion but signalled failure.
    #[error("{tool} exited unsuccessfully ({status})")]
    NonZeroExit {
        /// Program name as invoked.
        tool: String,
        /// Exit status reported by the OS.
        status: std::process::ExitStatus,
    },

    /// The tool produced output the adapter could not decode.
    #[error("unparseable output from {tool}: {reason}")]
    Output {
        /// Program name as invoked.
        tool: String,
        /// What was wrong with the output.
        reason: String,
    },

    /// The tool did not finish inside its time budget.
    #[error("{tool} timed out after {timeout:?}")]
    Timeout {
        /// Program name as invoked.
        tool: String,
        /// The budget that was exceeded.
        timeout: Duration,
    },
}

impl ProbeError {
    /// True when the tool is absent from the host entirely.
    ///
    /// Adapters branch on this: absence takes the fallback path, while a
    /// present-but-failing tool takes the zero-value error path.
    #[must_use]
    pub const fn is_tool_missing(&self) -> bool {
        matches!(self, Self::ToolMissing { .. })
    }
}
