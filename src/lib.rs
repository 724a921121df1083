//! Endpoint monitor
//!
//! Polls HTTP endpoints on a fixed cadence, keeps a bounded history of
//! results per endpoint and exposes them to a web dashboard and a CLI.

pub mod api;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod models;
pub mod prober;
pub mod registry;
pub mod store;
pub mod utils;

pub use config::MonitorConfig;
pub use engine::Monitor;
pub use error::{MonitorError, Result};
pub use models::{ProbeResult, Status, Target, TargetState};
