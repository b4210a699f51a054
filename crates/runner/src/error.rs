//! Tick-level error taxonomy.

use offhours_ec2::Ec2Error;

/// Errors surfaced by one scheduler tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// Some instances failed their state change; the rest of the batch
    /// completed. Distinct from a pipeline crash so operators can tell
    /// "some failed" apart from "nothing ran".
    #[error("{count} instance control failures occurred")]
    ControlFailures { count: usize },

    /// The fleet could not be listed at all; the tick did nothing.
    #[error("failed to list instances: {0}")]
    List(#[source] Ec2Error),

    /// Invalid configuration (e.g. an unknown timezone identifier).
    /// Raised at load time, never mid-tick.
    #[error("configuration error: {0}")]
    Config(String),
}
