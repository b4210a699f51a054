//! Engine configuration.

/// Switches that change which rules the engine evaluates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EngineConfig {
    /// Evaluate the legacy `scheduled*` / `auto_on` / `auto_off` tags.
    ///
    /// These predate the `ec2_start` / `ec2_stop` vocabulary and are kept as
    /// an operator-facing toggle so fleets can retire them without a code
    /// change.
    pub legacy_tags: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { legacy_tags: true }
    }
}
