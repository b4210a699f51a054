//! Orchestration driver: one tick of list → decide → act → report.

pub mod config;
pub mod driver;
pub mod error;

pub use config::RunnerConfig;
pub use driver::{TickDriver, TickSummary};
pub use error::TickError;
