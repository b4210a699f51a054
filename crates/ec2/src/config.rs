//! EC2 adapter configuration.

use std::env;

/// Region used when neither `OFFHOURS_REGION` nor `AWS_REGION` is set.
const DEFAULT_REGION: &str = "us-east-1";

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Configuration for the EC2 adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ec2Config {
    /// AWS region the fleet lives in.
    pub region: String,
}

impl Ec2Config {
    /// Build config from environment variables.
    ///
    /// `OFFHOURS_REGION` takes precedence over `AWS_REGION`.
    pub fn from_env() -> Self {
        let region = env_opt("OFFHOURS_REGION")
            .or_else(|| env_opt("AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        Self { region }
    }

    pub fn with_region(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}
