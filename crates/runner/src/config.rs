//! Runner configuration.

use std::str::FromStr;

use chrono_tz::Tz;

use crate::error::TickError;

/// Timezone the tag schedule is interpreted in when none is configured.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Upper bound on in-flight start/stop calls per tick.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Configuration for one scheduler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// IANA timezone identifier, e.g. `"Europe/Berlin"`.
    pub timezone: String,
    /// Whether the legacy tag family is still evaluated.
    pub legacy_tags: bool,
    /// Maximum concurrent state-change calls.
    pub concurrency: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            legacy_tags: true,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl RunnerConfig {
    /// Parse the configured timezone.
    ///
    /// Unknown identifiers fail here, at configuration load, so a typo
    /// surfaces once and loudly instead of on every tick.
    pub fn tz(&self) -> Result<Tz, TickError> {
        Tz::from_str(&self.timezone).map_err(|_| {
            TickError::Config(format!(
                "unknown timezone identifier: {:?}",
                self.timezone
            ))
        })
    }
}
