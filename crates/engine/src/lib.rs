//! Pure decision core for tag-driven instance scheduling.
//!
//! This crate provides:
//! - `TimeContext` / `HourPhase` quarter-hour time resolution
//! - `TagMap` and the recognized tag vocabulary with validation
//! - `Engine` with `should_start` / `should_stop` verdicts
//! - Advisory `Diagnostic`s instead of in-engine logging
//!
//! No I/O and no provider types live here; adapters convert external
//! instance data into [`InstanceSpec`] before evaluation.

pub mod clock;
pub mod config;
pub mod engine;
pub mod instance;
pub mod rules;
pub mod tags;

pub use clock::{HourPhase, TimeContext};
pub use config::EngineConfig;
pub use engine::{Decision, Engine};
pub use instance::{InstanceSpec, PowerState};
pub use rules::Diagnostic;
pub use tags::TagMap;
