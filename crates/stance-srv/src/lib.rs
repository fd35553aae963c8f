//! # stance-srv
//!
//! HTTP boundary for the stance posture evaluation service. Thin by
//! intent: `POST /scan` triggers one fresh evaluation and returns the
//! trust score, its breakdown, the evidence record, and a timestamp;
//! `GET /health` answers liveness. Everything with behavior lives in
//! `stance-engine`.

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::SrvError;

/// Result type for stance-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
