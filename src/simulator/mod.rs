//! Headless Monte Carlo harness for balance analysis.
//!
//! Runs full sessions with a scripted baseline player policy against the
//! rival, then aggregates outcomes into a report. Used by the `simulate`
//! binary and by balance experiments.

pub mod config;
pub mod report;
pub mod runner;

pub use config::{PlayerPolicy, SimConfig};
pub use report::SimReport;
pub use runner::{run_simulation, RunStats};
